//! Engine configuration with sane defaults.

/// Tunable constants for aggregation and insights.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
  /// Contributors listed in team metrics.
  pub top_contributors: usize,
  /// Width of trend buckets, in days.
  pub bucket_days: u32,
  /// Dimension mean at or above this is a strength.
  pub strength_threshold: f64,
  /// Dimension mean below this is an improvement area.
  pub improvement_threshold: f64,
  /// Repository mean score at or above this is reported as positive.
  pub high_quality_score: f64,
  /// Repository mean score below this is a warning.
  pub low_quality_score: f64,
  /// Test coverage % below this is a warning.
  pub low_test_coverage: f64,
  /// Test coverage % at or above this is positive.
  pub high_test_coverage: f64,
  /// Mean file count above this is reported as info.
  pub large_pr_files: f64,
  /// Ticket-link compliance % below this is a warning.
  pub low_ticket_compliance: f64,
}

impl Default for MetricsConfig {
  fn default() -> Self {
    Self {
      top_contributors: 5,
      bucket_days: 7,
      strength_threshold: 8.0,
      improvement_threshold: 6.0,
      high_quality_score: 8.0,
      low_quality_score: 6.0,
      low_test_coverage: 50.0,
      high_test_coverage: 80.0,
      large_pr_files: 15.0,
      low_ticket_compliance: 70.0,
    }
  }
}
