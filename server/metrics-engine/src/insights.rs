//! Threshold rules that turn repository statistics into qualitative insights.
//!
//! Checks run in a fixed order (score, test coverage, PR size, ticket links);
//! several may fire for the same repository.

use crate::config::MetricsConfig;
use crate::stats::WindowStats;
use crate::types::{Insight, InsightKind};

fn insight(kind: InsightKind, title: &str, description: String) -> Insight {
  Insight {
    kind,
    title: title.to_string(),
    description,
  }
}

pub fn repository_insights(stats: &WindowStats, config: &MetricsConfig) -> Vec<Insight> {
  let mut out = Vec::new();

  let score = stats.average_score;
  if score >= config.high_quality_score {
    out.push(insight(
      InsightKind::Positive,
      "High Quality Standards",
      format!(
        "Repository maintains excellent code quality with average score of {:.1}",
        score
      ),
    ));
  } else if score < config.low_quality_score {
    out.push(insight(
      InsightKind::Warning,
      "Quality Concerns",
      format!(
        "Repository has below-average quality scores ({:.1}). Consider code review improvements.",
        score
      ),
    ));
  }

  let coverage = stats.test_coverage;
  if coverage < config.low_test_coverage {
    out.push(insight(
      InsightKind::Warning,
      "Low Test Coverage",
      format!(
        "Only {:.1}% of PRs include tests. Consider improving test practices.",
        coverage
      ),
    ));
  } else if coverage >= config.high_test_coverage {
    out.push(insight(
      InsightKind::Positive,
      "Excellent Test Coverage",
      format!(
        "Repository has strong test coverage with {:.1}% of PRs including tests.",
        coverage
      ),
    ));
  }

  if stats.average_file_count > config.large_pr_files {
    out.push(insight(
      InsightKind::Info,
      "Large PR Size",
      format!(
        "Average PR touches {:.1} files. Consider breaking down large changes.",
        stats.average_file_count
      ),
    ));
  }

  if stats.ticket_compliance < config.low_ticket_compliance {
    out.push(insight(
      InsightKind::Warning,
      "Low Jira Compliance",
      format!(
        "Only {:.1}% of PRs are linked to Jira tickets.",
        stats.ticket_compliance
      ),
    ));
  }

  out
}

#[cfg(test)]
mod tests {
  use super::*;

  fn stats(score: f64, coverage: f64, files: f64, compliance: f64) -> WindowStats {
    WindowStats {
      count: 10,
      average_score: score,
      average_file_count: files,
      test_coverage: coverage,
      ticket_compliance: compliance,
    }
  }

  fn kinds(v: &[Insight]) -> Vec<(InsightKind, &str)> {
    v.iter().map(|i| (i.kind, i.title.as_str())).collect()
  }

  #[test]
  fn healthy_repository_gets_positive_insights() {
    let out = repository_insights(&stats(8.0, 80.0, 3.0, 100.0), &MetricsConfig::default());
    assert_eq!(
      kinds(&out),
      vec![
        (InsightKind::Positive, "High Quality Standards"),
        (InsightKind::Positive, "Excellent Test Coverage"),
      ]
    );
  }

  #[test]
  fn struggling_repository_triggers_all_warnings_in_order() {
    let out = repository_insights(&stats(4.2, 10.0, 20.0, 50.0), &MetricsConfig::default());
    assert_eq!(
      kinds(&out),
      vec![
        (InsightKind::Warning, "Quality Concerns"),
        (InsightKind::Warning, "Low Test Coverage"),
        (InsightKind::Info, "Large PR Size"),
        (InsightKind::Warning, "Low Jira Compliance"),
      ]
    );
    assert!(out[0].description.contains("(4.2)"));
  }

  #[test]
  fn middling_repository_has_no_insights() {
    let out = repository_insights(&stats(7.0, 60.0, 15.0, 70.0), &MetricsConfig::default());
    assert!(out.is_empty());
  }
}
