//! Axum route handlers for the ATS scoring API.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::errors::AppError;
use crate::models::score::{AnalyzeResult, ScoreResult};
use crate::scoring::vocabulary::VOCABULARY_VERSION;
use crate::state::AppState;

/// Shortest non-empty field accepted by the API, in non-whitespace characters.
pub const MIN_FIELD_CHARS: usize = 10;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub job_description: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/ats/score
///
/// Scores a resume against a job description. A field may be left empty (scored as no
/// information) but not both; a non-empty field must carry at least `MIN_FIELD_CHARS`.
pub async fn handle_score(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoreResult>, AppError> {
    validate_field("resume_text", &request.resume_text)?;
    validate_field("job_description", &request.job_description)?;

    let result = state
        .scorer
        .score(&request.resume_text, &request.job_description)
        .await?;

    info!(
        "Scored resume ({} chars) against job description ({} chars): {}",
        request.resume_text.len(),
        request.job_description.len(),
        result.overall_score
    );

    Ok(Json(result))
}

/// POST /api/v1/ats/analyze
///
/// Same input and validation as `/score`; also returns the top keywords of each document with
/// their weights and the raw experience and education readings.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<AnalyzeResult>, AppError> {
    validate_field("resume_text", &request.resume_text)?;
    validate_field("job_description", &request.job_description)?;

    let result = state
        .scorer
        .analyze(&request.resume_text, &request.job_description)
        .await?;

    info!(
        "Analyzed resume against job description: {} ({} resume keywords, {} job keywords)",
        result.ats_score.overall_score,
        result.detailed_analysis.resume_keywords.len(),
        result.detailed_analysis.job_keywords.len()
    );

    Ok(Json(result))
}

/// GET /api
///
/// Service description, endpoint list and the active scoring weights.
pub async fn handle_api_info(State(state): State<AppState>) -> Json<Value> {
    let weights = &state.config.weights;
    Json(json!({
        "service": "ats-scorer",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Scores how well a resume matches a job description",
        "vocabulary_version": VOCABULARY_VERSION,
        "weights": {
            "semantic_similarity": weights.semantic,
            "keyword_match": weights.keyword,
            "experience_alignment": weights.experience,
            "education_match": weights.education
        },
        "endpoints": {
            "score": "POST /api/v1/ats/score",
            "analyze": "POST /api/v1/ats/analyze",
            "health": "GET /health",
            "info": "GET /api"
        }
    }))
}

fn validate_field(name: &str, value: &str) -> Result<(), AppError> {
    let chars = value.chars().filter(|c| !c.is_whitespace()).count();
    if chars > 0 && chars < MIN_FIELD_CHARS {
        return Err(AppError::Validation(format!(
            "{name} must contain at least {MIN_FIELD_CHARS} characters"
        )));
    }
    Ok(())
}
