use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::scoring::vocabulary::VOCABULARY_VERSION;
use crate::state::AppState;

/// GET /health
/// Returns a status object with service version and the active scoring backends.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "ats-scorer",
        "version": env!("CARGO_PKG_VERSION"),
        "vocabulary_version": VOCABULARY_VERSION,
        "embedding_backend": state.scorer.embedding_backend()
    }))
}
