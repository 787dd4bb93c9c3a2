use std::sync::Arc;

use crate::config::Config;
use crate::scoring::AtsScorer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Scoring engine handle, built once at startup and shared read-only.
    pub scorer: Arc<dyn AtsScorer>,
}
