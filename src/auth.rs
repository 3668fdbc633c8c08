use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use rand::Rng;
use serde_json::{json, Value};
use sqlx::SqlitePool;

use lugat_backend::models::UserInfo;
use crate::state::AppState;

/// Session token length / Oturum anahtarı uzunluğu
pub const TOKEN_LENGTH: usize = 64;

type AuthError = (StatusCode, Json<Value>);

fn unauthorized(message: &str) -> AuthError {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": message })))
}

fn server_error() -> AuthError {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "Server error" })))
}

/// Read the token from `Authorization: Bearer <token>` / Bearer anahtarını oku
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Create a session for a user and return its token / Oturum oluştur
pub async fn create_session(pool: &SqlitePool, user_id: i64, ttl_hours: i64) -> Result<String, sqlx::Error> {
    let token: String = rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect();

    let now = chrono::Utc::now();
    let expires_at = now.timestamp() + ttl_hours * 60 * 60;

    // Expired sessions are dropped whenever a new one is issued / Süresi dolanlar temizlenir
    sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
        .bind(now.timestamp())
        .execute(pool)
        .await?;

    sqlx::query("INSERT INTO sessions (token, user_id, expires_at, created_at) VALUES (?, ?, ?, ?)")
        .bind(&token)
        .bind(user_id)
        .bind(expires_at)
        .bind(now.to_rfc3339())
        .execute(pool)
        .await?;

    Ok(token)
}

/// Resolve the calling user or fail with 401 / Oturumu doğrula
pub async fn require_user(state: &AppState, headers: &HeaderMap) -> Result<UserInfo, AuthError> {
    let token = extract_bearer_token(headers).ok_or_else(|| unauthorized("No token provided"))?;

    let user = sqlx::query_as::<_, UserInfo>(
        "SELECT u.id, u.username, COALESCE(u.role, 'admin') AS role
         FROM users u
         JOIN sessions s ON u.id = s.user_id
         WHERE s.token = ? AND s.expires_at > ?",
    )
    .bind(&token)
    .bind(chrono::Utc::now().timestamp())
    .fetch_optional(&state.db)
    .await
    .map_err(|e| {
        tracing::error!("Session lookup failed: {}", e);
        server_error()
    })?;

    user.ok_or_else(|| unauthorized("Invalid token"))
}

/// Delete one session (logout) / Oturumu sil
pub async fn delete_session(pool: &SqlitePool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

/// Delete every session of a user / Kullanıcının tüm oturumlarını sil
pub async fn delete_user_sessions(pool: &SqlitePool, user_id: i64) -> Result<(), sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;
    if result.rows_affected() > 0 {
        tracing::info!("Cleared {} sessions of user {}", result.rows_affected(), user_id);
    }
    Ok(())
}
