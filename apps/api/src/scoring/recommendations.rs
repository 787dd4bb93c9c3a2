//! Recommendation Generator — an ordered table of independent rules over the finished
//! analysis. Each rule looks at one factor and contributes at most one message.

use serde::{Deserialize, Serialize};

use crate::scoring::engine::Analysis;
use crate::scoring::ScoringError;

/// Missing keywords listed in the "Add keywords" message.
pub const MAX_SUGGESTED_KEYWORDS: usize = 5;

pub const WELL_ALIGNED: &str = "Resume looks well-aligned with the job description";

/// A factor scoring at or above its threshold gets no recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationThresholds {
    pub semantic: f64,
    pub keyword: f64,
    pub experience: f64,
    pub education: f64,
}

impl RecommendationThresholds {
    pub fn uniform(threshold: f64) -> Self {
        Self {
            semantic: threshold,
            keyword: threshold,
            experience: threshold,
            education: threshold,
        }
    }

    pub fn validate(&self) -> Result<(), ScoringError> {
        for (name, t) in [
            ("semantic", self.semantic),
            ("keyword", self.keyword),
            ("experience", self.experience),
            ("education", self.education),
        ] {
            if !(0.0..=100.0).contains(&t) {
                return Err(ScoringError::Config(format!(
                    "recommendation threshold '{name}' must be within 0-100, got {t}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        Self::uniform(80.0)
    }
}

pub struct Rule {
    pub name: &'static str,
    pub evaluate: fn(&Analysis, &RecommendationThresholds) -> Option<String>,
}

pub const RULES: &[Rule] = &[
    Rule {
        name: "missing_keywords",
        evaluate: missing_keywords,
    },
    Rule {
        name: "experience_shortfall",
        evaluate: experience_shortfall,
    },
    Rule {
        name: "education_shortfall",
        evaluate: education_shortfall,
    },
    Rule {
        name: "semantic_alignment",
        evaluate: semantic_alignment,
    },
];

/// Runs every rule in table order; falls back to a single positive message.
pub fn build_recommendations(
    analysis: &Analysis,
    thresholds: &RecommendationThresholds,
) -> Vec<String> {
    let fired: Vec<String> = RULES
        .iter()
        .filter_map(|rule| {
            let message = (rule.evaluate)(analysis, thresholds)?;
            tracing::debug!("Recommendation rule '{}' fired", rule.name);
            Some(message)
        })
        .collect();

    if fired.is_empty() {
        vec![WELL_ALIGNED.to_string()]
    } else {
        fired
    }
}

fn missing_keywords(analysis: &Analysis, thresholds: &RecommendationThresholds) -> Option<String> {
    let keywords = &analysis.keyword_match;
    if keywords.score >= thresholds.keyword || keywords.missing.is_empty() {
        return None;
    }
    let top: Vec<&str> = keywords
        .missing
        .iter()
        .take(MAX_SUGGESTED_KEYWORDS)
        .map(|k| k.term.as_str())
        .collect();
    Some(format!("Add keywords: {}", top.join(", ")))
}

fn experience_shortfall(
    analysis: &Analysis,
    thresholds: &RecommendationThresholds,
) -> Option<String> {
    if analysis.scores.experience_alignment >= thresholds.experience {
        return None;
    }
    let required = analysis.experience_requirement.as_ref()?.required_years();
    Some(format!(
        "Resume does not demonstrate the required {required} years; highlight relevant roles or projects"
    ))
}

fn education_shortfall(
    analysis: &Analysis,
    thresholds: &RecommendationThresholds,
) -> Option<String> {
    if analysis.scores.education_match >= thresholds.education {
        return None;
    }
    Some(format!(
        "Job requires at least {}; consider highlighting equivalent certifications or experience",
        analysis.required_education.display_name()
    ))
}

fn semantic_alignment(
    analysis: &Analysis,
    thresholds: &RecommendationThresholds,
) -> Option<String> {
    (analysis.scores.semantic_similarity < thresholds.semantic)
        .then(|| "Improve resume content to better match job requirements".to_string())
}
