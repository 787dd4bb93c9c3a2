// ATS scoring engine.
// Pipeline: normalize → keywords → match; semantic, experience and education run alongside;
// the aggregator and recommendation rules consume the combined analysis.
// Every stage is a pure function of its inputs; the only I/O is the embedding call.

use thiserror::Error;

pub mod education;
pub mod engine;
pub mod experience;
pub mod handlers;
pub mod keywords;
pub mod language;
pub mod matcher;
pub mod normalizer;
pub mod recommendations;
pub mod semantic;
pub mod vocabulary;
pub mod weights;

pub use engine::{AtsScorer, EngineConfig, ScoringEngine};

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Resume text and job description cannot both be empty")]
    EmptyInput,

    #[error("Invalid scoring configuration: {0}")]
    Config(String),
}
