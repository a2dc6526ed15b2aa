//! Rule-based suggestion table and low-dimension selection.

use crate::types::{Dimension, ScoreBreakdown};

/// Returned when no dimension is below the suggestion threshold.
pub const ALL_CLEAR: &str = "Great job! This PR meets all quality standards.";

/// Dimensions scoring below `threshold`, in evaluation order.
pub fn low_dimensions(breakdown: &ScoreBreakdown, threshold: f64) -> Vec<Dimension> {
  breakdown
    .iter()
    .filter(|(_, score)| *score < threshold)
    .map(|(d, _)| d)
    .collect()
}

/// One fixed sentence per dimension.
pub fn fallback_suggestion(dimension: Dimension) -> &'static str {
  match dimension {
    Dimension::Clarity => "Consider adding a more descriptive title and detailed description",
    Dimension::Context => "Provide more context about why this change is needed",
    Dimension::Completeness => "Add tests and update documentation if needed",
    Dimension::JiraLink => "Link this PR to the relevant Jira ticket",
  }
}

pub fn fallback_suggestions(low: &[Dimension]) -> Vec<String> {
  low.iter().map(|d| fallback_suggestion(*d).to_string()).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn low_dimensions_keep_evaluation_order() {
    let b = ScoreBreakdown {
      clarity: 6.9,
      context: 7.0,
      completeness: 2.0,
      jira_link: 0.0,
    };
    assert_eq!(
      low_dimensions(&b, 7.0),
      vec![Dimension::Clarity, Dimension::Completeness, Dimension::JiraLink]
    );
  }

  #[test]
  fn fallback_has_one_sentence_per_dimension() {
    let s = fallback_suggestions(&[Dimension::Context, Dimension::JiraLink]);
    assert_eq!(s.len(), 2);
    assert!(s[0].contains("context"));
    assert!(s[1].contains("Jira"));
  }
}
