//! Request/response types for the quality API.

use metrics_engine::{RecordContext, ScoreRecord};
use scoring_engine::{PrSubmission, ScoringResult};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PERIOD_DAYS: u32 = 30;
pub const DEFAULT_TRENDS_PERIOD_DAYS: u32 = 90;

#[derive(Deserialize)]
pub struct AnalyzePayload {
  pub submission: PrSubmission,
  #[serde(flatten)]
  pub context: RecordContext,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
  pub result: ScoringResult,
  pub record: ScoreRecord,
}

#[derive(Deserialize)]
pub struct PeriodQuery {
  pub period_days: Option<u32>,
}

#[derive(Deserialize)]
pub struct TeamQuery {
  pub period_days: Option<u32>,
  pub repository: Option<String>,
}

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorOutput {
  pub error: String,
  pub message: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub field: Option<String>,
}
