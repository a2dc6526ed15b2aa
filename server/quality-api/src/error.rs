//! Maps engine errors onto HTTP responses.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use metrics_engine::MetricsError;
use scoring_engine::ScoringError;
use tracing::error;

use crate::types::ErrorOutput;

#[derive(Debug)]
pub enum ApiError {
  Scoring(ScoringError),
  Metrics(MetricsError),
}

impl From<ScoringError> for ApiError {
  fn from(e: ScoringError) -> Self {
    Self::Scoring(e)
  }
}

impl From<MetricsError> for ApiError {
  fn from(e: MetricsError) -> Self {
    Self::Metrics(e)
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, kind, field) = match &self {
      ApiError::Scoring(ScoringError::InvalidInput { field, .. })
      | ApiError::Metrics(MetricsError::InvalidInput { field, .. }) => {
        (StatusCode::BAD_REQUEST, "invalid_input", Some(field.clone()))
      }
      ApiError::Metrics(MetricsError::Aggregation { .. }) => {
        (StatusCode::INTERNAL_SERVER_ERROR, "aggregation_failed", None)
      }
      ApiError::Scoring(_) => (StatusCode::INTERNAL_SERVER_ERROR, "scoring_failed", None),
    };

    let message = match &self {
      ApiError::Scoring(e) => e.to_string(),
      ApiError::Metrics(e) => e.to_string(),
    };
    if status.is_server_error() {
      error!(error = %message, "request failed");
    }

    let body = ErrorOutput {
      error: kind.to_string(),
      message,
      field,
    };
    (status, Json(body)).into_response()
  }
}
