//! Structured error types for the metrics engine.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsError {
  #[error("validation: {field}: {reason}")]
  InvalidInput { field: String, reason: String },

  #[error("{query} over {period_days} days: {reason}")]
  Aggregation {
    query: &'static str,
    period_days: u32,
    reason: String,
  },
}

impl MetricsError {
  pub fn validation(field: &str, reason: &str) -> Self {
    Self::InvalidInput {
      field: field.to_string(),
      reason: reason.to_string(),
    }
  }

  pub fn aggregation(query: &'static str, period_days: u32, reason: impl Into<String>) -> Self {
    Self::Aggregation {
      query,
      period_days,
      reason: reason.into(),
    }
  }
}
