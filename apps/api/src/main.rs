mod config;
mod embedding;
mod errors;
mod models;
mod routes;
mod scoring;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::embedding::{EmbeddingProvider, HashingEmbeddingProvider, HttpEmbeddingProvider};
use crate::routes::build_router;
use crate::scoring::vocabulary::VOCABULARY_VERSION;
use crate::scoring::ScoringEngine;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ATS Scorer v{}", env!("CARGO_PKG_VERSION"));

    // Initialize embedding provider (hashing fallback when no endpoint is configured)
    let embedder = build_embedder(&config)?;
    info!("Embedding provider initialized (backend: {})", embedder.backend());

    // Initialize scoring engine (built once, shared read-only across requests)
    let engine = ScoringEngine::new(embedder, config.engine_config())?;
    info!(
        "Scoring engine initialized: vocabulary v{} ({} skills), weights {:?}",
        VOCABULARY_VERSION,
        engine.vocabulary().len(),
        engine.config().weights
    );

    let state = AppState {
        config: config.clone(),
        scorer: Arc::new(engine),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web form has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_embedder(config: &Config) -> Result<Arc<dyn EmbeddingProvider>> {
    match &config.embedding_url {
        Some(url) => {
            info!("Using embedding endpoint {url} (model: {})", config.embedding_model);
            let provider = HttpEmbeddingProvider::new(
                url.clone(),
                config.embedding_model.clone(),
                config.embedding_api_key.clone(),
                config.embedding_timeout,
            )?;
            Ok(Arc::new(provider))
        }
        None => {
            info!("EMBEDDING_URL not set; using local hashing embeddings");
            Ok(Arc::new(HashingEmbeddingProvider::default()))
        }
    }
}
