pub mod auth;
pub mod server;
pub mod similar;
pub mod users;
pub mod words;

use axum::{
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Error half of every handler result / Hata cevabı
pub type ApiError = (StatusCode, Json<Value>);

pub fn api_error(status: StatusCode, message: &str) -> ApiError {
    (status, Json(json!({ "error": message })))
}

/// Log a database failure and hide its details from the client
pub fn db_error(e: sqlx::Error) -> ApiError {
    tracing::error!("Database error: {}", e);
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
}

/// Path ids must be plain digits / Kimlik yalnızca rakam olmalı
pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(api_error(StatusCode::BAD_REQUEST, "Invalid ID format"));
    }
    raw.parse::<i64>()
        .map_err(|_| api_error(StatusCode::BAD_REQUEST, "Invalid ID format"))
}

/// Build the HTTP router / HTTP yönlendiricisini kur
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(server::health_check))
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::get_current_user))
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route("/api/users/:id", delete(users::delete_user))
        .route("/api/words", get(words::list_words).post(words::create_word))
        .route("/api/words/random", get(words::random_word))
        .route(
            "/api/words/:id",
            get(words::get_word).put(words::update_word).delete(words::delete_word),
        )
        .route("/api/words/:id/similar", get(similar::similar_words))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
