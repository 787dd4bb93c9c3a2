use std::time::Duration;

use anyhow::{Context, Result};

use crate::embedding::DEFAULT_MODEL;
use crate::scoring::recommendations::RecommendationThresholds;
use crate::scoring::weights::ScoringWeights;
use crate::scoring::EngineConfig;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// OpenAI-compatible embeddings endpoint. Unset selects the local hashing provider.
    pub embedding_url: Option<String>,
    pub embedding_model: String,
    pub embedding_api_key: Option<String>,
    pub embedding_timeout: Duration,
    pub weights: ScoringWeights,
    pub recommendation_threshold: f64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key → value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ScoringWeights::default();

        Ok(Config {
            port: parse_or(&lookup, "PORT", 8080)
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            embedding_url: optional(&lookup, "EMBEDDING_URL"),
            embedding_model: optional(&lookup, "EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            embedding_api_key: optional(&lookup, "EMBEDDING_API_KEY"),
            embedding_timeout: Duration::from_millis(
                parse_or(&lookup, "EMBEDDING_TIMEOUT_MS", 10_000_u64)
                    .context("EMBEDDING_TIMEOUT_MS must be a whole number of milliseconds")?,
            ),
            weights: ScoringWeights {
                semantic: parse_or(&lookup, "WEIGHT_SEMANTIC", defaults.semantic)?,
                keyword: parse_or(&lookup, "WEIGHT_KEYWORD", defaults.keyword)?,
                experience: parse_or(&lookup, "WEIGHT_EXPERIENCE", defaults.experience)?,
                education: parse_or(&lookup, "WEIGHT_EDUCATION", defaults.education)?,
            },
            recommendation_threshold: parse_or(&lookup, "RECOMMENDATION_THRESHOLD", 80.0)?,
        })
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            weights: self.weights.clone(),
            thresholds: RecommendationThresholds::uniform(self.recommendation_threshold),
            embedding_timeout: self.embedding_timeout,
        }
    }
}

/// Unset or blank counts as absent.
fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional(lookup, key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        None => Ok(default),
    }
}
