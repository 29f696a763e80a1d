use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status with the active embedding backend.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "cv-match-api",
        "embedding_backend": state.matcher.embedder().name(),
        "semantic_matching": state.matcher.embedder().semantic(),
        "match_threshold": state.config.match_threshold,
        "resume_parsing": state.llm.is_some()
    }))
}
