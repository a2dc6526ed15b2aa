//! Text-analysis capability: the only external call the scoring engine makes.
//!
//! Implementations return validated values or an [`AnalysisError`]; the engine
//! bounds each call with a timeout and falls back to the local rules on any error.

use async_trait::async_trait;

use crate::error::{AnalysisError, AnalysisResult};
use crate::types::Dimension;

/// A clarity rating known to lie in 1..=10.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ClarityRating(f64);

impl ClarityRating {
  pub fn new(value: f64) -> AnalysisResult<Self> {
    if value.is_finite() && (1.0..=10.0).contains(&value) {
      Ok(Self(value))
    } else {
      Err(AnalysisError::OutOfRange(value))
    }
  }

  pub fn value(self) -> f64 {
    self.0
  }
}

#[async_trait]
pub trait TextAnalyzer: Send + Sync {
  fn name(&self) -> &str;

  /// Rate how clear the title and description are, 1-10.
  async fn rate_clarity(&self, title: &str, description: &str) -> AnalysisResult<ClarityRating>;

  /// Two or three actionable suggestions for the low-scoring dimensions.
  async fn suggest_improvements(
    &self,
    low_dimensions: &[Dimension],
    title: &str,
    description: &str,
  ) -> AnalysisResult<Vec<String>>;
}

/// Parse a clarity reply that should contain only a number.
pub fn parse_clarity_reply(reply: &str) -> AnalysisResult<ClarityRating> {
  let trimmed = reply.trim();
  let value: f64 = trimmed
    .parse()
    .map_err(|_| AnalysisError::Parse(format!("expected a number, got {:?}", trimmed)))?;
  ClarityRating::new(value)
}

/// Parse a suggestions reply that should be a JSON array of strings.
///
/// Blank entries are dropped; an array with nothing left is an error.
pub fn parse_suggestions_reply(reply: &str) -> AnalysisResult<Vec<String>> {
  let value: serde_json::Value = serde_json::from_str(reply.trim())
    .map_err(|e| AnalysisError::Parse(format!("suggestions: {}", e)))?;

  let items = value
    .as_array()
    .ok_or_else(|| AnalysisError::Parse("suggestions: expected a JSON array".into()))?;

  let suggestions: Vec<String> = items
    .iter()
    .filter_map(|v| v.as_str())
    .map(|s| s.trim().to_string())
    .filter(|s| !s.is_empty())
    .collect();

  if suggestions.is_empty() {
    return Err(AnalysisError::Parse("suggestions: no usable strings".into()));
  }
  Ok(suggestions)
}
