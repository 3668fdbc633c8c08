use axum::{
    extract::State,
    http::HeaderMap,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::ApiError;
use crate::auth::require_user;
use crate::state::AppState;

/// GET /api/auth/me - current user / Oturumdaki kullanıcı
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user = require_user(&state, &headers).await?;
    Ok(Json(json!(user)))
}
