//! Core types for the metrics engine (ledger records + aggregate reports).

use chrono::{DateTime, Utc};
use scoring_engine::{has_test_files, PrSubmission, Rating, ScoreBreakdown, ScoringResult};
use serde::{Deserialize, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Ledger record
// ---------------------------------------------------------------------------

/// Outcome of one scoring run as kept in the ledger. Never mutated once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
  pub record_id: String,
  pub submission_id: String,
  pub repository: String,
  pub author: String,
  pub total_score: f64,
  pub rating: Rating,
  pub breakdown: ScoreBreakdown,
  pub file_count: u32,
  pub has_tests: bool,
  pub has_ticket_link: bool,
  #[serde(default)]
  pub comment_count: u32,
  #[serde(default)]
  pub review_time_hours: Option<f64>,
  pub created_at: DateTime<Utc>,
  pub analyzed_at: DateTime<Utc>,
}

/// Where and by whom a scored submission was made.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordContext {
  pub repository: String,
  pub author: String,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub comment_count: u32,
  #[serde(default)]
  pub review_time_hours: Option<f64>,
}

impl ScoreRecord {
  /// Build a record from a scoring run; `created_at` defaults to `analyzed_at`.
  pub fn from_scoring(
    submission: &PrSubmission,
    result: &ScoringResult,
    context: RecordContext,
    analyzed_at: DateTime<Utc>,
  ) -> Self {
    Self {
      record_id: record_id(&submission.id, &context.repository, &analyzed_at),
      submission_id: submission.id.clone(),
      repository: context.repository,
      author: context.author,
      total_score: result.total_score,
      rating: result.rating,
      breakdown: result.breakdown,
      file_count: u32::try_from(submission.files.len()).unwrap_or(u32::MAX),
      has_tests: has_test_files(submission),
      has_ticket_link: submission.ticket_context.is_some(),
      comment_count: context.comment_count,
      review_time_hours: context.review_time_hours,
      created_at: context.created_at.unwrap_or(analyzed_at),
      analyzed_at,
    }
  }

  /// All numeric fields are finite.
  pub fn is_well_formed(&self) -> bool {
    self.total_score.is_finite()
      && self.breakdown.is_finite()
      && self.review_time_hours.map_or(true, f64::is_finite)
  }
}

/// Stable record id: hash of submission + repository + analysis time.
pub fn record_id(submission_id: &str, repository: &str, analyzed_at: &DateTime<Utc>) -> String {
  let mut hasher = blake3::Hasher::new();
  hasher.update(submission_id.as_bytes());
  hasher.update(b"|");
  hasher.update(repository.as_bytes());
  hasher.update(b"|");
  hasher.update(analyzed_at.to_rfc3339().as_bytes());
  let hex = hasher.finalize().to_hex();
  format!("rec-{}", &hex[..16])
}

// ---------------------------------------------------------------------------
// Team metrics
// ---------------------------------------------------------------------------

/// Count per rating bucket; every bucket is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingDistribution {
  pub excellent: u32,
  pub good: u32,
  #[serde(rename = "needs-improvement")]
  pub needs_improvement: u32,
  pub poor: u32,
}

impl RatingDistribution {
  pub fn add(&mut self, rating: Rating) {
    match rating {
      Rating::Excellent => self.excellent += 1,
      Rating::Good => self.good += 1,
      Rating::NeedsImprovement => self.needs_improvement += 1,
      Rating::Poor => self.poor += 1,
    }
  }

  pub fn total(&self) -> u32 {
    self.excellent + self.good + self.needs_improvement + self.poor
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contributor {
  pub name: String,
  pub pr_count: u32,
  pub average_score: f64,
}

/// Deltas against the preceding window; absent when that window is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImprovementTrends {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub score_change: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub test_coverage_change: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMetrics {
  pub team_name: String,
  pub period_start: DateTime<Utc>,
  pub period_end: DateTime<Utc>,
  pub total_prs: u32,
  pub average_score: f64,
  pub score_distribution: RatingDistribution,
  pub average_review_time_hours: Option<f64>,
  pub average_file_count: f64,
  pub test_coverage_percentage: f64,
  pub jira_link_compliance: f64,
  pub top_contributors: Vec<Contributor>,
  pub improvement_trends: ImprovementTrends,
}

// ---------------------------------------------------------------------------
// Developer metrics
// ---------------------------------------------------------------------------

/// Serialized as a `[week_start, average_score]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "(DateTime<Utc>, f64)", from = "(DateTime<Utc>, f64)")]
pub struct WeeklyScore {
  pub week_start: DateTime<Utc>,
  pub average_score: f64,
}

impl From<WeeklyScore> for (DateTime<Utc>, f64) {
  fn from(w: WeeklyScore) -> Self {
    (w.week_start, w.average_score)
  }
}

impl From<(DateTime<Utc>, f64)> for WeeklyScore {
  fn from((week_start, average_score): (DateTime<Utc>, f64)) -> Self {
    Self {
      week_start,
      average_score,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeveloperMetrics {
  pub developer_name: String,
  pub period_start: DateTime<Utc>,
  pub period_end: DateTime<Utc>,
  pub total_prs: u32,
  pub average_score: f64,
  pub score_trend: Vec<WeeklyScore>,
  pub strengths: Vec<String>,
  pub improvement_areas: Vec<String>,
  pub productivity_score: f64,
  pub quality_score: f64,
  pub collaboration_score: f64,
}

// ---------------------------------------------------------------------------
// Repository insights
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
  Positive,
  Warning,
  Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
  #[serde(rename = "type")]
  pub kind: InsightKind,
  pub title: String,
  pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepositoryStats {
  pub average_score: f64,
  pub test_coverage: f64,
  pub jira_compliance: f64,
  pub average_file_count: f64,
}

/// `stats` is absent when the window holds no records for the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryInsights {
  pub repository: String,
  pub period_days: u32,
  pub total_prs: u32,
  #[serde(flatten)]
  pub stats: Option<RepositoryStats>,
  pub insights: Vec<Insight>,
}

// ---------------------------------------------------------------------------
// Quality trends
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendBucket {
  pub week_start: DateTime<Utc>,
  pub pr_count: u32,
  pub average_score: f64,
  pub test_coverage: f64,
  pub jira_compliance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
  pub total_prs: u32,
  pub average_score: f64,
  pub test_coverage: f64,
  pub jira_compliance: f64,
  pub period_days: u32,
}

/// `summary` serializes as `{}` when the window is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityTrends {
  pub trends: Vec<TrendBucket>,
  #[serde(serialize_with = "empty_object_if_none", default, deserialize_with = "none_if_empty_object")]
  pub summary: Option<TrendSummary>,
}

fn empty_object_if_none<S: Serializer>(summary: &Option<TrendSummary>, s: S) -> Result<S::Ok, S::Error> {
  match summary {
    Some(v) => v.serialize(s),
    None => serde_json::Map::new().serialize(s),
  }
}

fn none_if_empty_object<'de, D: serde::Deserializer<'de>>(d: D) -> Result<Option<TrendSummary>, D::Error> {
  let value = serde_json::Value::deserialize(d)?;
  match value {
    serde_json::Value::Object(ref m) if m.is_empty() => Ok(None),
    serde_json::Value::Null => Ok(None),
    other => serde_json::from_value(other).map(Some).map_err(serde::de::Error::custom),
  }
}
