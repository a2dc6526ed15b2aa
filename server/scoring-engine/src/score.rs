//! Weighted total and rating classification.

use crate::config::{RatingThresholds, ScoringWeights};
use crate::types::{Rating, ScoreBreakdown};

/// Σ(sub_score × weight) over the unrounded breakdown.
pub fn weighted_total(breakdown: &ScoreBreakdown, weights: &ScoringWeights) -> f64 {
  breakdown.iter().map(|(d, score)| score * weights.get(d)).sum()
}

/// Threshold ladder, highest first; first match wins.
pub fn classify(total: f64, thresholds: &RatingThresholds) -> Rating {
  Rating::LADDER
    .into_iter()
    .find(|r| match thresholds.lower_bound(*r) {
      Some(bound) => total >= bound,
      None => true,
    })
    .unwrap_or(Rating::Poor)
}
