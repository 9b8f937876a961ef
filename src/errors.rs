//! Error types shared across the matching pipeline.

use thiserror::Error;

/// Failures of the embedding capability.
///
/// Cloneable so a single failed model load can be handed to every caller that
/// was waiting on it.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EmbeddingError {
    #[error("embedding model failed to initialize: {0}")]
    Init(String),
    #[error("embedding failed: {0}")]
    Compute(String),
    #[error("embedding dimensions differ: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },
}

/// Unexpected faults inside the rule chain.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MatchError {
    #[error("vocabulary matcher for '{term}' failed to compile: {message}")]
    Vocabulary { term: String, message: String },
    #[error("internal fault: {0}")]
    Internal(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("semantic threshold must be in (0, 1], got {0}")]
    Threshold(f32),
    #[error("unknown embedding model: {0}")]
    UnknownModel(String),
}

pub type MatchResult<T> = Result<T, MatchError>;
