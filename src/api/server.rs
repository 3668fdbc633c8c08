use axum::Json;
use serde_json::{json, Value};

/// GET /api/health - service liveness / Servis durumu
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "build_time": env!("BUILD_TIME"),
        "build_profile": env!("BUILD_PROFILE"),
    }))
}
