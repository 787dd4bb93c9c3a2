pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::scoring::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api", get(handlers::handle_api_info))
        // ATS scoring API
        .route("/api/v1/ats/score", post(handlers::handle_score))
        .route("/api/v1/ats/analyze", post(handlers::handle_analyze))
        .with_state(state)
}
