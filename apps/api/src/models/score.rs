use serde::{Deserialize, Serialize};

use crate::scoring::education::EducationLevel;
use crate::scoring::experience::{ExperienceAttainment, ExperienceRequirement, Seniority};
use crate::scoring::keywords::Keyword;

/// The four weighted factors, each 0 – 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub semantic_similarity: f64,
    pub keyword_match: f64,
    pub experience_alignment: f64,
    pub education_match: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceSummary {
    pub required_years: Option<u32>,
    pub seniority: Option<Seniority>,
    pub attained_years: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationSummary {
    pub required: EducationLevel,
    pub attained: EducationLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreAnalysis {
    /// Descending job-description importance.
    pub matched_keywords: Vec<String>,
    /// Descending job-description importance.
    pub missing_keywords: Vec<String>,
    pub recommendations: Vec<String>,
    pub experience: ExperienceSummary,
    pub education: EducationSummary,
}

/// Result of one scoring request. Built once by the engine and returned as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub overall_score: f64,
    pub scores: SubScores,
    pub analysis: ScoreAnalysis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceLevels {
    pub resume: ExperienceAttainment,
    pub job_requirement: Option<ExperienceRequirement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationLevels {
    pub resume: EducationLevel,
    pub job_requirement: EducationLevel,
}

/// Extracted inputs behind a score: the top keywords of each document with their weights and
/// the raw experience and education readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedAnalysis {
    pub resume_keywords: Vec<Keyword>,
    pub job_keywords: Vec<Keyword>,
    pub experience_levels: ExperienceLevels,
    pub education_levels: EducationLevels,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResult {
    pub ats_score: ScoreResult,
    pub detailed_analysis: DetailedAnalysis,
}
