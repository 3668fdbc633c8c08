use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use lugat_backend::error::SimilarityError;
use lugat_backend::models::WordView;
use crate::api::{api_error, parse_id, ApiError};
use crate::state::AppState;

/// GET /api/words/:id/similar - related words / Benzer kelimeler
pub async fn similar_words(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;

    let words = state
        .engine
        .find_similar(id, &state.corpus)
        .await
        .map_err(|e| match e {
            SimilarityError::NotFound(_) => api_error(StatusCode::NOT_FOUND, "Word not found"),
            SimilarityError::Corpus(e) => {
                tracing::error!("Similar words lookup for {} failed: {}", id, e);
                api_error(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
            }
        })?;

    let similar: Vec<WordView> = words.into_iter().map(WordView::from).collect();
    Ok(Json(json!({ "similar": similar })))
}
