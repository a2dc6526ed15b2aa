//! Input/output types for the scoring engine (JSON contract with the host).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Inbound types (what the caller sends)
// ---------------------------------------------------------------------------

/// One pull request submission. Unknown fields are silently ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrSubmission {
  pub id: String,
  pub title: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub files: Vec<FileChange>,
  /// Files the caller already recognized as test artifacts.
  #[serde(default)]
  pub tests: Vec<FileChange>,
  /// Present iff the PR is linked to a tracking ticket.
  #[serde(default)]
  pub ticket_context: Option<TicketContext>,
}

impl PrSubmission {
  pub fn new(id: impl Into<String>, title: impl Into<String>, description: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      title: title.into(),
      description: description.into(),
      files: Vec::new(),
      tests: Vec::new(),
      ticket_context: None,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
  pub filename: String,
  #[serde(default)]
  pub status: FileStatus,
}

impl FileChange {
  pub fn new(filename: impl Into<String>, status: FileStatus) -> Self {
    Self {
      filename: filename.into(),
      status,
    }
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
  Added,
  #[default]
  Modified,
  Removed,
}

/// Linked-ticket context supplied by the tracker integration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketContext {
  #[serde(default)]
  pub ticket_id: Option<String>,
  #[serde(default, alias = "ticket_status")]
  pub status: Option<String>,
  #[serde(default, alias = "ticket_type")]
  pub issue_type: Option<String>,
  #[serde(default)]
  pub priority: Option<String>,
}

// ---------------------------------------------------------------------------
// Dimensions and breakdown
// ---------------------------------------------------------------------------

/// The four scored dimensions, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
  Clarity,
  Context,
  Completeness,
  JiraLink,
}

impl Dimension {
  pub const ALL: [Dimension; 4] = [
    Dimension::Clarity,
    Dimension::Context,
    Dimension::Completeness,
    Dimension::JiraLink,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Clarity => "clarity",
      Self::Context => "context",
      Self::Completeness => "completeness",
      Self::JiraLink => "jira_link",
    }
  }
}

impl std::fmt::Display for Dimension {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Per-dimension scores. Keys are fixed and always all present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
  pub clarity: f64,
  pub context: f64,
  pub completeness: f64,
  pub jira_link: f64,
}

impl ScoreBreakdown {
  pub fn get(&self, dimension: Dimension) -> f64 {
    match dimension {
      Dimension::Clarity => self.clarity,
      Dimension::Context => self.context,
      Dimension::Completeness => self.completeness,
      Dimension::JiraLink => self.jira_link,
    }
  }

  /// (dimension, score) pairs in evaluation order.
  pub fn iter(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
    Dimension::ALL.into_iter().map(move |d| (d, self.get(d)))
  }

  pub fn is_finite(&self) -> bool {
    self.iter().all(|(_, v)| v.is_finite())
  }

  pub fn rounded(&self) -> Self {
    Self {
      clarity: round1(self.clarity),
      context: round1(self.context),
      completeness: round1(self.completeness),
      jira_link: round1(self.jira_link),
    }
  }
}

/// Round to one decimal for presentation.
///
/// Rounds the exact binary value, ties to even: 3.25 -> 3.2, and 8.45
/// (stored as 8.4499..) -> 8.4, so a displayed total never crosses a
/// rating threshold the unrounded total did not reach.
pub fn round1(v: f64) -> f64 {
  format!("{:.1}", v).parse().unwrap_or(v)
}

// ---------------------------------------------------------------------------
// Rating
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rating {
  Poor,
  NeedsImprovement,
  Good,
  Excellent,
}

impl Rating {
  /// Highest to lowest, the order the threshold ladder is evaluated in.
  pub const LADDER: [Rating; 4] = [
    Rating::Excellent,
    Rating::Good,
    Rating::NeedsImprovement,
    Rating::Poor,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Excellent => "excellent",
      Self::Good => "good",
      Self::NeedsImprovement => "needs-improvement",
      Self::Poor => "poor",
    }
  }
}

impl std::fmt::Display for Rating {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

// ---------------------------------------------------------------------------
// Output types (what we emit)
// ---------------------------------------------------------------------------

/// Which branch produced a value: the text-analysis call or the local rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisSource {
  Ai,
  Rules,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSources {
  pub clarity: AnalysisSource,
  pub suggestions: AnalysisSource,
}

/// Outcome of one scoring run. Scores are rounded to one decimal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringResult {
  pub submission_id: String,
  pub total_score: f64,
  pub rating: Rating,
  pub breakdown: ScoreBreakdown,
  pub suggestions: Vec<String>,
  pub sources: AnalysisSources,
  pub scored_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ticket_context_accepts_tracker_aliases() {
    let json = r#"{"ticket_id":"AUTH-123","ticket_status":"In Progress","ticket_type":"Story","priority":"High"}"#;
    let ctx: TicketContext = serde_json::from_str(json).unwrap();
    assert_eq!(ctx.status.as_deref(), Some("In Progress"));
    assert_eq!(ctx.issue_type.as_deref(), Some("Story"));
  }

  #[test]
  fn submission_defaults_optional_fields() {
    let json = r#"{"id":"42","title":"fix"}"#;
    let sub: PrSubmission = serde_json::from_str(json).unwrap();
    assert!(sub.description.is_empty());
    assert!(sub.files.is_empty());
    assert!(sub.tests.is_empty());
    assert!(sub.ticket_context.is_none());
  }

  #[test]
  fn rating_serializes_kebab_case() {
    let s = serde_json::to_string(&Rating::NeedsImprovement).unwrap();
    assert_eq!(s, "\"needs-improvement\"");
    assert!(Rating::Excellent > Rating::Good);
  }

  #[test]
  fn breakdown_iterates_in_evaluation_order() {
    let b = ScoreBreakdown {
      clarity: 1.0,
      context: 2.0,
      completeness: 3.0,
      jira_link: 4.0,
    };
    let dims: Vec<_> = b.iter().map(|(d, _)| d.as_str()).collect();
    assert_eq!(dims, vec!["clarity", "context", "completeness", "jira_link"]);
  }

  #[test]
  fn round1_rounds_exact_value_ties_to_even() {
    assert_eq!(round1(9.875), 9.9);
    assert_eq!(round1(3.25), 3.2);
    assert_eq!(round1(3.35), 3.4);
    assert_eq!(round1(0.15), 0.1);
    assert_eq!(round1(8.45), 8.4);
    assert_eq!(round1(10.0), 10.0);
    assert_eq!(round1(0.0), 0.0);
  }
}
