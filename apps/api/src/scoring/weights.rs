use serde::{Deserialize, Serialize};

use crate::models::score::SubScores;
use crate::scoring::ScoringError;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub semantic: f64,
    pub keyword: f64,
    pub experience: f64,
    pub education: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            semantic: 0.30,
            keyword: 0.40,
            experience: 0.20,
            education: 0.10,
        }
    }
}

impl ScoringWeights {
    /// Each weight finite and non-negative, and the four summing to 1.0.
    pub fn validate(&self) -> Result<(), ScoringError> {
        let all = [
            ("semantic", self.semantic),
            ("keyword", self.keyword),
            ("experience", self.experience),
            ("education", self.education),
        ];
        if let Some((name, w)) = all.iter().find(|(_, w)| !w.is_finite() || *w < 0.0) {
            return Err(ScoringError::Config(format!(
                "weight '{name}' must be a non-negative number, got {w}"
            )));
        }
        let sum: f64 = all.iter().map(|(_, w)| w).sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ScoringError::Config(format!(
                "weights must sum to 1.0, got {sum}"
            )));
        }
        Ok(())
    }
}

/// Weighted sum of the four sub-scores, clamped to [0, 100] and rounded to one decimal.
pub fn compute_overall_score(scores: &SubScores, weights: &ScoringWeights) -> f64 {
    let overall = weights.semantic * scores.semantic_similarity
        + weights.keyword * scores.keyword_match
        + weights.experience * scores.experience_alignment
        + weights.education * scores.education_match;
    round_to_tenth(overall.clamp(0.0, 100.0))
}

pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(semantic: f64, keyword: f64, experience: f64, education: f64) -> SubScores {
        SubScores {
            semantic_similarity: semantic,
            keyword_match: keyword,
            experience_alignment: experience,
            education_match: education,
        }
    }

    #[test]
    fn test_default_weights_are_valid() {
        assert!(ScoringWeights::default().validate().is_ok());
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let w = ScoringWeights {
            semantic: 0.5,
            keyword: 0.5,
            experience: 0.5,
            education: 0.0,
        };
        assert!(matches!(w.validate(), Err(ScoringError::Config(_))));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let w = ScoringWeights {
            semantic: -0.1,
            keyword: 0.7,
            experience: 0.3,
            education: 0.1,
        };
        let err = w.validate().unwrap_err();
        assert!(err.to_string().contains("semantic"));
    }

    #[test]
    fn test_overall_full() {
        let w = ScoringWeights::default();
        assert_eq!(compute_overall_score(&scores(100.0, 100.0, 100.0, 100.0), &w), 100.0);
    }

    #[test]
    fn test_overall_partial() {
        let w = ScoringWeights::default();
        // 0.3*80 + 0.4*50 + 0.2*100 + 0.1*75 = 24 + 20 + 20 + 7.5 = 71.5
        let overall = compute_overall_score(&scores(80.0, 50.0, 100.0, 75.0), &w);
        assert!((overall - 71.5).abs() < 1e-9, "Score was {overall}");
    }

    #[test]
    fn test_failed_factor_contributes_zero() {
        let w = ScoringWeights::default();
        let overall = compute_overall_score(&scores(0.0, 100.0, 100.0, 100.0), &w);
        assert!((overall - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_overall_rounded_to_one_decimal() {
        let w = ScoringWeights::default();
        // 0.3*33.33 + 0.4*66.67 + 0.2*10 + 0.1*0 = 9.999 + 26.668 + 2 = 38.667
        let overall = compute_overall_score(&scores(33.33, 66.67, 10.0, 0.0), &w);
        assert!((overall - 38.7).abs() < 1e-9, "Score was {overall}");
    }

    #[test]
    fn test_overall_clamped() {
        let w = ScoringWeights {
            semantic: 1.0,
            keyword: 0.0,
            experience: 0.0,
            education: 0.0,
        };
        assert_eq!(compute_overall_score(&scores(150.0, 0.0, 0.0, 0.0), &w), 100.0);
    }
}
