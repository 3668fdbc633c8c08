use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;

use lugat_backend::models::{CreateUserRequest, UserInfo};
use crate::api::{api_error, db_error, parse_id, ApiError};
use crate::auth::{delete_user_sessions, require_user};
use crate::state::AppState;

/// Account that can never be deleted / Silinemeyen hesap
const PROTECTED_USERNAME: &str = "admin";

/// GET /api/users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    require_user(&state, &headers).await?;

    let users = sqlx::query_as::<_, UserInfo>(
        "SELECT id, username, COALESCE(role, 'admin') AS role FROM users ORDER BY id ASC",
    )
    .fetch_all(&state.db)
    .await
    .map_err(db_error)?;

    Ok(Json(json!(users)))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<Value>, ApiError> {
    let current = require_user(&state, &headers).await?;

    let username = req.username.as_deref().map(str::trim).unwrap_or_default();
    let password = req.password.as_deref().unwrap_or_default();
    if username.is_empty() || password.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Username and password required"));
    }

    let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(&state.db)
        .await
        .map_err(db_error)?;
    if exists.is_some() {
        return Err(api_error(StatusCode::CONFLICT, "Username already exists"));
    }

    let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|_| api_error(StatusCode::INTERNAL_SERVER_ERROR, "Server error"))?;

    let result = sqlx::query(
        "INSERT INTO users (username, password_hash, role, created_at) VALUES (?, ?, 'admin', ?)",
    )
    .bind(username)
    .bind(&password_hash)
    .bind(Utc::now().to_rfc3339())
    .execute(&state.db)
    .await
    .map_err(db_error)?;

    tracing::info!("User {} created by {}", username, current.username);

    Ok(Json(json!({
        "id": result.last_insert_rowid(),
        "message": "User created"
    })))
}

/// DELETE /api/users/:id
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let current = require_user(&state, &headers).await?;
    let id = parse_id(&id)?;

    let username: String = sqlx::query_scalar("SELECT username FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Kullanıcı bulunamadı"))?;

    if username == PROTECTED_USERNAME {
        return Err(api_error(StatusCode::FORBIDDEN, "Ana 'admin' hesabı silinemez."));
    }

    delete_user_sessions(&state.db, id).await.map_err(db_error)?;
    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(&state.db)
        .await
        .map_err(db_error)?;

    tracing::info!("User {} deleted by {}", username, current.username);

    Ok(Json(json!({ "message": "Kullanıcı silindi" })))
}
