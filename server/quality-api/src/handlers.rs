//! HTTP handlers for the quality API.

use axum::{
  extract::{Path, Query, State},
  http::StatusCode,
  Json,
};
use metrics_engine::{DeveloperMetrics, QualityTrends, RepositoryInsights, ScoreRecord, TeamMetrics};
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{
  AnalyzePayload, AnalyzeResponse, PeriodQuery, TeamQuery, DEFAULT_PERIOD_DAYS, DEFAULT_TRENDS_PERIOD_DAYS,
};

pub async fn health() -> &'static str {
  "ok"
}

/// Score a submission and record the outcome.
pub async fn analyze(
  State(state): State<Arc<AppState>>,
  Json(payload): Json<AnalyzePayload>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
  let result = state.scoring.calculate_score(&payload.submission).await?;
  let record = state
    .metrics
    .record_analysis(&payload.submission, &result, payload.context)?;
  info!(
    submission_id = %record.submission_id,
    score = record.total_score,
    rating = result.rating.as_str(),
    "analyzed submission"
  );
  Ok(Json(AnalyzeResponse { result, record }))
}

/// Append an already-scored record.
pub async fn record(
  State(state): State<Arc<AppState>>,
  Json(record): Json<ScoreRecord>,
) -> Result<(StatusCode, Json<ScoreRecord>), ApiError> {
  let stored = state.metrics.record(record)?;
  Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn team_metrics(
  State(state): State<Arc<AppState>>,
  Path(team): Path<String>,
  Query(q): Query<TeamQuery>,
) -> Result<Json<TeamMetrics>, ApiError> {
  let period = q.period_days.unwrap_or(DEFAULT_PERIOD_DAYS);
  let m = state.metrics.team_metrics(&team, period, q.repository.as_deref())?;
  Ok(Json(m))
}

pub async fn developer_metrics(
  State(state): State<Arc<AppState>>,
  Path(name): Path<String>,
  Query(q): Query<PeriodQuery>,
) -> Result<Json<DeveloperMetrics>, ApiError> {
  let period = q.period_days.unwrap_or(DEFAULT_PERIOD_DAYS);
  Ok(Json(state.metrics.developer_metrics(&name, period)?))
}

pub async fn repository_insights(
  State(state): State<Arc<AppState>>,
  Path(repository): Path<String>,
  Query(q): Query<PeriodQuery>,
) -> Result<Json<RepositoryInsights>, ApiError> {
  let period = q.period_days.unwrap_or(DEFAULT_PERIOD_DAYS);
  Ok(Json(state.metrics.repository_insights(&repository, period)?))
}

pub async fn quality_trends(
  State(state): State<Arc<AppState>>,
  Query(q): Query<PeriodQuery>,
) -> Result<Json<QualityTrends>, ApiError> {
  let period = q.period_days.unwrap_or(DEFAULT_TRENDS_PERIOD_DAYS);
  Ok(Json(state.metrics.quality_trends(period)?))
}
