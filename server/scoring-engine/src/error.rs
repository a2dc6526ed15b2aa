//! Structured error types for the scoring engine.

use std::time::Duration;

use thiserror::Error;

/// Errors surfaced to callers of the scoring engine.
#[derive(Debug, Error)]
pub enum ScoringError {
  #[error("invalid input: {field}: {reason}")]
  InvalidInput { field: String, reason: String },

  #[error("scoring failed for {submission_id}: {reason}")]
  Internal { submission_id: String, reason: String },

  #[error("config: {key}: {reason}")]
  Config { key: String, reason: String },
}

impl ScoringError {
  pub fn invalid_input(field: &str, reason: &str) -> Self {
    Self::InvalidInput {
      field: field.to_string(),
      reason: reason.to_string(),
    }
  }

  pub fn internal(submission_id: &str, reason: impl Into<String>) -> Self {
    Self::Internal {
      submission_id: submission_id.to_string(),
      reason: reason.into(),
    }
  }

  pub fn config(key: &str, reason: &str) -> Self {
    Self::Config {
      key: key.to_string(),
      reason: reason.to_string(),
    }
  }
}

/// A failed text-analysis call. Always recovered by the rule-based branch.
#[derive(Debug, Error)]
pub enum AnalysisError {
  #[error("text analysis unavailable")]
  Unavailable,

  #[error("text analysis timed out after {0:?}")]
  Timeout(Duration),

  #[error("request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("api error: {status} - {message}")]
  Api { status: u16, message: String },

  #[error("unparseable reply: {0}")]
  Parse(String),

  #[error("rating {0} outside 1-10")]
  OutOfRange(f64),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
