//! Embedding client — the single point of entry for text-to-vector calls.
//!
//! The scoring engine only sees `EmbeddingProvider`. Two backends:
//! `HttpEmbeddingProvider` (OpenAI-compatible `/embeddings` endpoint) and
//! `HashingEmbeddingProvider` (deterministic, local, used when no endpoint is configured).
//!
//! Failures are definitive: no retries. The caller degrades the semantic sub-score to 0.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod hashing;

pub use hashing::HashingEmbeddingProvider;

/// Default sentence-embedding model requested from the endpoint.
pub const DEFAULT_MODEL: &str = "all-MiniLM-L6-v2";

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Embedding unavailable: {0}")]
    Unavailable(String),

    #[error("Embedding call timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Text-to-vector capability. Implementations must be safe to share across requests.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Short backend label, surfaced by the health endpoint.
    fn backend(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Client for an OpenAI-compatible embeddings endpoint (OpenAI, text-embeddings-inference,
/// Ollama, vLLM all speak this shape).
#[derive(Clone)]
pub struct HttpEmbeddingProvider {
    client: Client,
    url: String,
    model: String,
    api_key: Option<String>,
}

impl HttpEmbeddingProvider {
    pub fn new(
        url: String,
        model: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, EmbeddingError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            url,
            model,
            api_key,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::Unavailable("empty text".to_string()));
        }

        let mut request = self
            .client
            .post(&self.url)
            .header("content-type", "application/json")
            .json(&EmbeddingRequest {
                model: &self.model,
                input: text,
            });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                message: api_error_message(body),
            });
        }

        let body = response.text().await?;
        let vector = parse_embedding(&body)?;
        debug!(
            "Embedding call succeeded: model={}, dimensions={}",
            self.model,
            vector.len()
        );
        Ok(vector)
    }

    fn backend(&self) -> &str {
        "http"
    }
}

/// Extracts the first embedding from an endpoint response body.
fn parse_embedding(body: &str) -> Result<Vec<f32>, EmbeddingError> {
    let response: EmbeddingResponse = serde_json::from_str(body)?;
    let vector = response
        .data
        .into_iter()
        .next()
        .map(|d| d.embedding)
        .ok_or_else(|| EmbeddingError::Unavailable("response contained no embedding".into()))?;
    if vector.is_empty() {
        return Err(EmbeddingError::Unavailable("empty embedding vector".into()));
    }
    Ok(vector)
}

/// Pulls `error.message` out of an API error body, falling back to the raw body.
fn api_error_message(body: String) -> String {
    serde_json::from_str::<ApiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}
