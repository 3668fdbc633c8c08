use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use lugat_backend::models::{LoginRequest, User};
use crate::api::{api_error, db_error, ApiError};
use crate::auth::{create_session, delete_session, extract_bearer_token};
use crate::state::AppState;

fn invalid_credentials() -> ApiError {
    api_error(StatusCode::UNAUTHORIZED, "Invalid credentials")
}

/// POST /api/login - exchange credentials for a bearer token / Giriş
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let username = req.username.trim();
    if username.is_empty() || req.password.is_empty() {
        return Err(invalid_credentials());
    }

    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, COALESCE(role, 'admin') AS role FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(&state.db)
    .await
    .map_err(db_error)?
    .ok_or_else(invalid_credentials)?;

    let valid = bcrypt::verify(&req.password, &user.password_hash).map_err(|e| {
        tracing::error!("Password check failed for {}: {}", user.username, e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
    })?;
    if !valid {
        tracing::warn!("Failed login for {}", user.username);
        return Err(invalid_credentials());
    }

    let token = create_session(&state.db, user.id, state.config.auth.session_ttl_hours)
        .await
        .map_err(db_error)?;
    tracing::info!("User {} logged in", user.username);

    Ok(Json(json!({
        "token": token,
        "username": user.username,
        "role": user.role,
        "message": "Login successful"
    })))
}

/// POST /api/logout - revoke the current token / Çıkış
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    if let Some(token) = extract_bearer_token(&headers) {
        delete_session(&state.db, &token).await.map_err(db_error)?;
    }
    Ok(Json(json!({ "message": "Logged out" })))
}
