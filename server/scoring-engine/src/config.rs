//! Scoring configuration with sane defaults, overridable from the environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::error::ScoringError;
use crate::types::{Dimension, Rating};

/// Per-dimension weights. Expected to sum to 1.0; not normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
  pub clarity: f64,
  pub context: f64,
  pub completeness: f64,
  pub jira_link: f64,
}

impl Default for ScoringWeights {
  fn default() -> Self {
    Self {
      clarity: 0.30,
      context: 0.25,
      completeness: 0.25,
      jira_link: 0.20,
    }
  }
}

impl ScoringWeights {
  pub fn get(&self, dimension: Dimension) -> f64 {
    match dimension {
      Dimension::Clarity => self.clarity,
      Dimension::Context => self.context,
      Dimension::Completeness => self.completeness,
      Dimension::JiraLink => self.jira_link,
    }
  }

  pub fn sum(&self) -> f64 {
    self.clarity + self.context + self.completeness + self.jira_link
  }
}

/// Lower bounds of the rating ladder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingThresholds {
  pub excellent: f64,
  pub good: f64,
  pub needs_improvement: f64,
}

impl Default for RatingThresholds {
  fn default() -> Self {
    Self {
      excellent: 8.5,
      good: 7.0,
      needs_improvement: 5.0,
    }
  }
}

impl RatingThresholds {
  /// Lower bound for a rating; `Poor` has none.
  pub fn lower_bound(&self, rating: Rating) -> Option<f64> {
    match rating {
      Rating::Excellent => Some(self.excellent),
      Rating::Good => Some(self.good),
      Rating::NeedsImprovement => Some(self.needs_improvement),
      Rating::Poor => None,
    }
  }
}

/// Tunables for the scoring engine.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
  pub weights: ScoringWeights,
  pub thresholds: RatingThresholds,
  /// Dimensions scoring below this get a suggestion.
  pub suggestion_threshold: f64,
  /// Ask the text-analysis capability for suggestions (otherwise static table).
  pub ai_suggestions: bool,
  /// Upper bound on every text-analysis call.
  pub analyzer_timeout: Duration,
}

impl Default for ScoringConfig {
  fn default() -> Self {
    Self {
      weights: ScoringWeights::default(),
      thresholds: RatingThresholds::default(),
      suggestion_threshold: 7.0,
      ai_suggestions: true,
      analyzer_timeout: Duration::from_secs(10),
    }
  }
}

impl ScoringConfig {
  /// Defaults overridden by `SCORING_*` / `FEATURE_AI_SUGGESTIONS` variables.
  pub fn from_env() -> Result<Self, ScoringError> {
    let d = Self::default();
    let config = Self {
      weights: ScoringWeights {
        clarity: env_or("SCORING_CLARITY_WEIGHT", d.weights.clarity)?,
        context: env_or("SCORING_CONTEXT_WEIGHT", d.weights.context)?,
        completeness: env_or("SCORING_COMPLETENESS_WEIGHT", d.weights.completeness)?,
        jira_link: env_or("SCORING_JIRA_WEIGHT", d.weights.jira_link)?,
      },
      thresholds: RatingThresholds {
        excellent: env_or("SCORING_EXCELLENT_THRESHOLD", d.thresholds.excellent)?,
        good: env_or("SCORING_GOOD_THRESHOLD", d.thresholds.good)?,
        needs_improvement: env_or(
          "SCORING_NEEDS_IMPROVEMENT_THRESHOLD",
          d.thresholds.needs_improvement,
        )?,
      },
      suggestion_threshold: d.suggestion_threshold,
      ai_suggestions: env_flag("FEATURE_AI_SUGGESTIONS", d.ai_suggestions),
      analyzer_timeout: Duration::from_secs(env_or(
        "SCORING_AI_TIMEOUT_SECS",
        d.analyzer_timeout.as_secs(),
      )?),
    };
    config.warn_if_unnormalized();
    Ok(config)
  }

  /// Weights are used as given; a set that does not sum to 1.0 shifts the total range.
  pub fn warn_if_unnormalized(&self) {
    let sum = self.weights.sum();
    if (sum - 1.0).abs() > 1e-6 {
      warn!(sum, "scoring weights do not sum to 1.0; totals may leave the 1-10 range");
    }
  }
}

fn env_or<T: FromStr>(key: &str, default: T) -> Result<T, ScoringError>
where
  T::Err: std::fmt::Display,
{
  match env::var(key) {
    Ok(raw) => raw
      .trim()
      .parse()
      .map_err(|e: T::Err| ScoringError::config(key, &e.to_string())),
    Err(_) => Ok(default),
  }
}

fn env_flag(key: &str, default: bool) -> bool {
  env::var(key)
    .map(|v| {
      let v = v.trim().to_ascii_lowercase();
      v == "true" || v == "1" || v == "yes"
    })
    .unwrap_or(default)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_weights_sum_to_one() {
    let w = ScoringWeights::default();
    assert!((w.sum() - 1.0).abs() < 1e-9);
  }

  #[test]
  fn thresholds_follow_ladder() {
    let t = RatingThresholds::default();
    assert_eq!(t.lower_bound(Rating::Excellent), Some(8.5));
    assert_eq!(t.lower_bound(Rating::Poor), None);
  }

  #[test]
  fn unparseable_env_value_is_config_error() {
    env::set_var("SCORING_TEST_ONLY_WEIGHT", "heavy");
    let err = env_or::<f64>("SCORING_TEST_ONLY_WEIGHT", 0.3).unwrap_err();
    env::remove_var("SCORING_TEST_ONLY_WEIGHT");
    assert!(err.to_string().contains("SCORING_TEST_ONLY_WEIGHT"));
  }

  #[test]
  fn missing_env_value_uses_default() {
    let v = env_or::<f64>("SCORING_TEST_ONLY_UNSET", 0.25).unwrap();
    assert_eq!(v, 0.25);
  }
}
