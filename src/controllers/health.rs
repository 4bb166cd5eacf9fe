use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;
use crate::infrastructure::config::Config;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn health_ready(State(config): State<Arc<Config>>) -> impl IntoResponse {
    let missing = config.missing_required();
    if missing.is_empty() {
        (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "tts": "configured",
                "storage": "configured"
            })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not_ready",
                "missing": missing
            })),
        )
    }
}
