//! Scoring engine — the explicitly constructed handle that runs the whole pipeline.
//!
//! `AppState` holds it as `Arc<dyn AtsScorer>` so handlers and tests can swap in a stub.
//! Everything inside is read-only after `new`; requests never share mutable state.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tracing::{debug, warn};

use crate::embedding::EmbeddingProvider;
use crate::models::score::{
    AnalyzeResult, DetailedAnalysis, EducationLevels, EducationSummary, ExperienceLevels,
    ExperienceSummary, ScoreAnalysis, ScoreResult, SubScores,
};
use crate::scoring::education::{education_score, EducationAnalyzer, EducationLevel};
use crate::scoring::experience::{
    experience_score, ExperienceAnalyzer, ExperienceAttainment, ExperienceRequirement,
};
use crate::scoring::keywords::{extract_keywords, DocumentRole, Keyword};
use crate::scoring::language::{LanguageProcessor, RuleBasedProcessor};
use crate::scoring::matcher::{KeywordMatch, KeywordMatcher};
use crate::scoring::normalizer::{ensure_scorable, normalize};
use crate::scoring::recommendations::{build_recommendations, RecommendationThresholds};
use crate::scoring::semantic::semantic_score;
use crate::scoring::vocabulary::Vocabulary;
use crate::scoring::weights::{compute_overall_score, round_to_tenth, ScoringWeights};
use crate::scoring::ScoringError;

pub const DEFAULT_EMBEDDING_TIMEOUT: Duration = Duration::from_secs(10);

/// Keywords listed per document in a detailed analysis.
pub const MAX_LISTED_KEYWORDS: usize = 20;

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap the scoring backend without touching the handler.
#[async_trait]
pub trait AtsScorer: Send + Sync {
    async fn score(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<ScoreResult, ScoringError>;

    /// Score plus the extracted keywords, experience and education readings behind it.
    async fn analyze(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<AnalyzeResult, ScoringError>;

    fn embedding_backend(&self) -> &str;
}

// ────────────────────────────────────────────────────────────────────────────
// Configuration and intermediate analysis
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub weights: ScoringWeights,
    pub thresholds: RecommendationThresholds,
    pub embedding_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            thresholds: RecommendationThresholds::default(),
            embedding_timeout: DEFAULT_EMBEDDING_TIMEOUT,
        }
    }
}

/// Everything the recommendation rules look at. Built once per request, never mutated.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub scores: SubScores,
    pub keyword_match: KeywordMatch,
    pub experience_requirement: Option<ExperienceRequirement>,
    pub experience_attainment: ExperienceAttainment,
    pub required_education: EducationLevel,
    pub attained_education: EducationLevel,
}

// ────────────────────────────────────────────────────────────────────────────
// ScoringEngine
// ────────────────────────────────────────────────────────────────────────────

pub struct ScoringEngine {
    processor: Arc<dyn LanguageProcessor>,
    embedder: Arc<dyn EmbeddingProvider>,
    vocabulary: Vocabulary,
    matcher: KeywordMatcher,
    experience: ExperienceAnalyzer,
    education: EducationAnalyzer,
    config: EngineConfig,
}

impl ScoringEngine {
    /// Builds the engine with the built-in vocabulary and the rule-based language processor.
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        config: EngineConfig,
    ) -> Result<Self, ScoringError> {
        let processor = Arc::new(RuleBasedProcessor::new(&Vocabulary::builtin()));
        Self::with_processor(processor, embedder, config)
    }

    /// Builds the engine around any language processor, e.g. a model-backed lemmatizer.
    pub fn with_processor(
        processor: Arc<dyn LanguageProcessor>,
        embedder: Arc<dyn EmbeddingProvider>,
        config: EngineConfig,
    ) -> Result<Self, ScoringError> {
        config.weights.validate()?;
        config.thresholds.validate()?;
        if config.embedding_timeout.is_zero() {
            return Err(ScoringError::Config(
                "embedding timeout must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            processor,
            embedder,
            vocabulary: Vocabulary::builtin(),
            matcher: KeywordMatcher::new(),
            experience: ExperienceAnalyzer::new(),
            education: EducationAnalyzer::new(),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Scores with `today` as the end of ongoing resume date ranges.
    pub async fn score_at(
        &self,
        resume_text: &str,
        job_description: &str,
        today: NaiveDate,
    ) -> Result<ScoreResult, ScoringError> {
        self.analyze_at(resume_text, job_description, today)
            .await
            .map(|analyzed| analyzed.ats_score)
    }

    pub async fn analyze_at(
        &self,
        resume_text: &str,
        job_description: &str,
        today: NaiveDate,
    ) -> Result<AnalyzeResult, ScoringError> {
        ensure_scorable(resume_text, job_description)?;

        let resume_tokens = normalize(resume_text, self.processor.as_ref());
        let jd_tokens = normalize(job_description, self.processor.as_ref());
        debug!(
            "Normalized with {}: resume={} tokens, jd={} tokens",
            self.processor.name(),
            resume_tokens.len(),
            jd_tokens.len()
        );
        let resume_keywords = extract_keywords(&resume_tokens, DocumentRole::Resume, &self.vocabulary);
        let jd_keywords =
            extract_keywords(&jd_tokens, DocumentRole::JobDescription, &self.vocabulary);
        let keyword_match = self
            .matcher
            .match_sets(&resume_tokens, &jd_keywords, &self.vocabulary);
        debug!(
            "Keywords: resume={} jd={} matched={} missing={}",
            resume_keywords.len(),
            jd_keywords.len(),
            keyword_match.matched.len(),
            keyword_match.missing.len()
        );

        let semantic = match semantic_score(
            self.embedder.as_ref(),
            resume_text,
            job_description,
            self.config.embedding_timeout,
        )
        .await
        {
            Ok(score) => score,
            Err(e) => {
                warn!(
                    "Semantic similarity unavailable ({} backend), scoring it as 0: {e}",
                    self.embedder.backend()
                );
                0.0
            }
        };

        let experience_requirement = self.experience.requirement(job_description);
        let experience_attainment = self.experience.attainment(resume_text, today);
        let experience = experience_score(
            experience_requirement.as_ref(),
            experience_attainment.years,
        );

        let required_education = self.education.highest_level(job_description);
        let attained_education = self.education.highest_level(resume_text);
        let education = education_score(required_education, attained_education);

        let scores = SubScores {
            semantic_similarity: round_to_tenth(semantic),
            keyword_match: round_to_tenth(keyword_match.score),
            experience_alignment: round_to_tenth(experience),
            education_match: round_to_tenth(education),
        };
        let overall_score = compute_overall_score(&scores, &self.config.weights);

        let detailed_analysis = DetailedAnalysis {
            resume_keywords: resume_keywords.top(MAX_LISTED_KEYWORDS),
            job_keywords: jd_keywords.top(MAX_LISTED_KEYWORDS),
            experience_levels: ExperienceLevels {
                resume: experience_attainment.clone(),
                job_requirement: experience_requirement.clone(),
            },
            education_levels: EducationLevels {
                resume: attained_education,
                job_requirement: required_education,
            },
        };

        let analysis = Analysis {
            scores,
            keyword_match,
            experience_requirement,
            experience_attainment,
            required_education,
            attained_education,
        };
        let recommendations = build_recommendations(&analysis, &self.config.thresholds);
        debug!("Overall score {overall_score} ({scores:?})");

        Ok(AnalyzeResult {
            ats_score: into_result(overall_score, analysis, recommendations),
            detailed_analysis,
        })
    }
}

#[async_trait]
impl AtsScorer for ScoringEngine {
    async fn score(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<ScoreResult, ScoringError> {
        self.score_at(resume_text, job_description, Utc::now().date_naive())
            .await
    }

    async fn analyze(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<AnalyzeResult, ScoringError> {
        self.analyze_at(resume_text, job_description, Utc::now().date_naive())
            .await
    }

    fn embedding_backend(&self) -> &str {
        self.embedder.backend()
    }
}

fn terms(keywords: Vec<Keyword>) -> Vec<String> {
    keywords.into_iter().map(|k| k.term).collect()
}

fn into_result(overall_score: f64, analysis: Analysis, recommendations: Vec<String>) -> ScoreResult {
    ScoreResult {
        overall_score,
        scores: analysis.scores,
        analysis: ScoreAnalysis {
            matched_keywords: terms(analysis.keyword_match.matched),
            missing_keywords: terms(analysis.keyword_match.missing),
            recommendations,
            experience: ExperienceSummary {
                required_years: analysis
                    .experience_requirement
                    .as_ref()
                    .map(ExperienceRequirement::required_years),
                seniority: analysis
                    .experience_requirement
                    .as_ref()
                    .and_then(|r| r.seniority),
                attained_years: analysis.experience_attainment.years,
            },
            education: EducationSummary {
                required: analysis.required_education,
                attained: analysis.attained_education,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::{EmbeddingError, HashingEmbeddingProvider};
    use crate::scoring::recommendations::WELL_ALIGNED;

    struct FailingProvider;

    #[async_trait]
    impl EmbeddingProvider for FailingProvider {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
            Err(EmbeddingError::Unavailable("model not loaded".to_string()))
        }

        fn backend(&self) -> &str {
            "failing"
        }
    }

    fn engine() -> ScoringEngine {
        ScoringEngine::new(
            Arc::new(HashingEmbeddingProvider::default()),
            EngineConfig::default(),
        )
        .unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn in_range(value: f64) -> bool {
        (0.0..=100.0).contains(&value)
    }

    #[tokio::test]
    async fn test_scenario_requirements_met() {
        let result = engine()
            .score_at(
                "5 years experience as a Python developer, Bachelor's degree in Computer Science",
                "Requires 3+ years Python experience, Bachelor's degree required",
                today(),
            )
            .await
            .unwrap();

        assert_eq!(result.scores.experience_alignment, 100.0);
        assert_eq!(result.scores.education_match, 100.0);
        assert!(result
            .analysis
            .matched_keywords
            .contains(&"python".to_string()));
        assert_eq!(result.analysis.experience.required_years, Some(3));
        assert_eq!(result.analysis.experience.attained_years, 5);
        assert_eq!(result.analysis.education.required, EducationLevel::Bachelor);
    }

    #[tokio::test]
    async fn test_scenario_requirements_missing_from_resume() {
        let result = engine()
            .score_at(
                "Friendly person who enjoys puzzles and teamwork",
                "5+ years, Master's degree",
                today(),
            )
            .await
            .unwrap();

        assert_eq!(result.scores.experience_alignment, 0.0);
        assert_eq!(result.scores.education_match, 0.0);
        let recs = &result.analysis.recommendations;
        assert!(recs
            .iter()
            .any(|r| r.contains("required 5 years")));
        assert!(recs
            .iter()
            .any(|r| r.starts_with("Job requires at least a master's degree")));
    }

    #[tokio::test]
    async fn test_scenario_no_requirements_stated() {
        let jd = "Join our platform group to build reliable Python services on AWS";
        for resume in ["Python", "Intern. High school diploma.", "20+ years, PhD"] {
            let result = engine().score_at(resume, jd, today()).await.unwrap();
            assert_eq!(result.scores.experience_alignment, 100.0);
            assert_eq!(result.scores.education_match, 100.0);
        }
    }

    #[tokio::test]
    async fn test_scenario_embedding_failure_degrades_semantic_only() {
        let engine =
            ScoringEngine::new(Arc::new(FailingProvider), EngineConfig::default()).unwrap();
        let result = engine
            .score_at(
                "5 years experience as a Python developer, Bachelor's degree in Computer Science",
                "Requires 3+ years Python experience, Bachelor's degree required",
                today(),
            )
            .await
            .unwrap();

        assert_eq!(result.scores.semantic_similarity, 0.0);
        let expected = round_to_tenth(
            0.4 * result.scores.keyword_match
                + 0.2 * result.scores.experience_alignment
                + 0.1 * result.scores.education_match,
        );
        assert!((result.overall_score - expected).abs() < 1e-9);
        assert_eq!(engine.embedding_backend(), "failing");
    }

    #[tokio::test]
    async fn test_both_empty_is_rejected() {
        let err = engine().score_at("  ", "\n", today()).await.unwrap_err();
        assert!(matches!(err, ScoringError::EmptyInput));
    }

    #[tokio::test]
    async fn test_single_empty_field_is_scored() {
        let result = engine()
            .score_at("", "Senior Rust engineer with Kafka", today())
            .await
            .unwrap();
        assert_eq!(result.scores.semantic_similarity, 0.0);
        assert_eq!(result.scores.keyword_match, 0.0);
        assert!(!result.analysis.missing_keywords.is_empty());
    }

    #[tokio::test]
    async fn test_scores_are_bounded() {
        let pairs = [
            ("Python", "Java"),
            ("10+ years Kubernetes, PhD", "Entry-level role, high school diploma"),
            ("Chef", "Principal architect, 15+ years, doctorate, Rust, Go, Kafka, Terraform"),
        ];
        for (resume, jd) in pairs {
            let r = engine().score_at(resume, jd, today()).await.unwrap();
            assert!(in_range(r.overall_score));
            assert!(in_range(r.scores.semantic_similarity));
            assert!(in_range(r.scores.keyword_match));
            assert!(in_range(r.scores.experience_alignment));
            assert!(in_range(r.scores.education_match));
        }
    }

    #[tokio::test]
    async fn test_scoring_is_idempotent() {
        let engine = engine();
        let resume = "Backend engineer, Jan 2019 - Present. Go, PostgreSQL, Kafka. MSc.";
        let jd = "Senior backend engineer: Go, Kafka, Kubernetes. Master's degree preferred.";
        let first = engine.score_at(resume, jd, today()).await.unwrap();
        let second = engine.score_at(resume, jd, today()).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_more_experience_never_scores_lower() {
        let engine = engine();
        let jd = "8+ years of backend experience";
        let mut previous = 0.0;
        for years in [0, 2, 4, 8, 12] {
            let resume = format!("{years} years of backend experience");
            let r = engine.score_at(&resume, jd, today()).await.unwrap();
            assert!(r.scores.experience_alignment >= previous);
            previous = r.scores.experience_alignment;
        }
        assert_eq!(previous, 100.0);
    }

    #[tokio::test]
    async fn test_well_aligned_resume_gets_positive_feedback() {
        let engine = ScoringEngine::new(
            Arc::new(HashingEmbeddingProvider::default()),
            EngineConfig {
                thresholds: RecommendationThresholds::uniform(0.0),
                ..EngineConfig::default()
            },
        )
        .unwrap();
        let r = engine
            .score_at("Python. Docker.", "Python. Docker.", today())
            .await
            .unwrap();
        assert_eq!(r.analysis.recommendations, vec![WELL_ALIGNED]);
    }

    #[tokio::test]
    async fn test_identical_documents_score_high() {
        let text = "Senior Python developer, 6+ years, Django, PostgreSQL, AWS. Bachelor's degree.";
        let r = engine().score_at(text, text, today()).await.unwrap();
        assert_eq!(r.scores.keyword_match, 100.0);
        assert_eq!(r.scores.semantic_similarity, 100.0);
        assert_eq!(r.overall_score, 100.0);
    }

    struct SilentProcessor;

    impl LanguageProcessor for SilentProcessor {
        fn analyze(&self, _text: &str) -> Vec<crate::scoring::language::Token> {
            Vec::new()
        }

        fn name(&self) -> &str {
            "silent"
        }
    }

    #[tokio::test]
    async fn test_custom_processor_is_used() {
        let engine = ScoringEngine::with_processor(
            Arc::new(SilentProcessor),
            Arc::new(HashingEmbeddingProvider::default()),
            EngineConfig::default(),
        )
        .unwrap();
        let r = engine
            .score_at("Python developer", "Kafka engineer", today())
            .await
            .unwrap();
        // No tokens means no job-description keywords to miss.
        assert_eq!(r.scores.keyword_match, 100.0);
        assert!(r.analysis.missing_keywords.is_empty());
    }

    #[test]
    fn test_invalid_weights_rejected_at_construction() {
        let config = EngineConfig {
            weights: ScoringWeights {
                semantic: 0.5,
                keyword: 0.5,
                experience: 0.5,
                education: 0.5,
            },
            ..EngineConfig::default()
        };
        let result = ScoringEngine::new(Arc::new(HashingEmbeddingProvider::default()), config);
        assert!(matches!(result, Err(ScoringError::Config(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = EngineConfig {
            embedding_timeout: Duration::ZERO,
            ..EngineConfig::default()
        };
        let result = ScoringEngine::new(Arc::new(HashingEmbeddingProvider::default()), config);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_verb_form_in_resume_matches_noun_in_job_description() {
        let r = engine()
            .score_at("Developing.", "Development.", today())
            .await
            .unwrap();
        assert_eq!(r.analysis.matched_keywords, vec!["development".to_string()]);
        assert_eq!(r.scores.keyword_match, 100.0);
    }

    #[tokio::test]
    async fn test_unpunctuated_resume_append_never_lowers_keyword_score() {
        let engine = engine();
        let jd = "Developer. Architecture.";
        let base = engine.score_at("Python developer", jd, today()).await.unwrap();
        let appended = engine
            .score_at("Python developer architecture", jd, today())
            .await
            .unwrap();
        assert!(appended.scores.keyword_match >= base.scores.keyword_match);
        assert_eq!(appended.scores.keyword_match, 100.0);
    }

    #[tokio::test]
    async fn test_no_keyword_overlap_is_positive_zero() {
        let r = engine().score_at("Python.", "Kafka.", today()).await.unwrap();
        assert_eq!(r.scores.keyword_match, 0.0);
        assert!(r.scores.keyword_match.is_sign_positive());
    }

    #[tokio::test]
    async fn test_analyze_reports_extracted_inputs() {
        let engine = engine();
        let resume = "5 years experience as a Python developer, Bachelor's degree in Computer Science";
        let jd = "Requires 3+ years Python experience, Master's degree required";
        let analyzed = engine.analyze_at(resume, jd, today()).await.unwrap();
        let scored = engine.score_at(resume, jd, today()).await.unwrap();

        assert_eq!(analyzed.ats_score, scored);
        let detail = &analyzed.detailed_analysis;
        assert!(detail.resume_keywords.iter().any(|k| k.term == "python"));
        assert!(detail.job_keywords.iter().any(|k| k.term == "python"));
        assert!(detail.job_keywords.iter().all(|k| k.weight > 0.0));
        assert_eq!(detail.experience_levels.resume.years, 5);
        assert_eq!(
            detail
                .experience_levels
                .job_requirement
                .as_ref()
                .map(ExperienceRequirement::required_years),
            Some(3)
        );
        assert_eq!(detail.education_levels.resume, EducationLevel::Bachelor);
        assert_eq!(detail.education_levels.job_requirement, EducationLevel::Master);
    }

    #[tokio::test]
    async fn test_analyze_caps_listed_keywords() {
        let words = [
            "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel", "india",
            "juliet", "kilo", "lima", "mike", "november", "oscar", "papa", "quebec", "romeo",
            "sierra", "tango", "uniform", "victor", "whiskey", "xray", "yankee", "zulu",
        ];
        let text = words.join(". ");
        let analyzed = engine().analyze_at(&text, &text, today()).await.unwrap();
        assert_eq!(analyzed.detailed_analysis.resume_keywords.len(), MAX_LISTED_KEYWORDS);
        assert_eq!(analyzed.detailed_analysis.job_keywords.len(), MAX_LISTED_KEYWORDS);
    }
}
