//! PR Quality API
//!
//! HTTP service that scores pull requests and serves quality dashboards.
//! Bind to 127.0.0.1 by default (internal only).

mod error;
mod handlers;
mod state;
mod types;

use std::sync::Arc;

use axum::{
  routing::{get, post},
  Router,
};
use tower_http::cors::CorsLayer;

pub use error::ApiError;
pub use handlers::{analyze, developer_metrics, health, quality_trends, record, repository_insights, team_metrics};
pub use state::AppState;
pub use types::{AnalyzePayload, AnalyzeResponse, ErrorOutput};

pub fn router(state: Arc<AppState>) -> Router {
  Router::new()
    .route("/health", get(health))
    .route("/api/v1/analyze", post(analyze))
    .route("/api/v1/records", post(record))
    .route("/api/v1/metrics/team/:team", get(team_metrics))
    .route("/api/v1/metrics/developer/:name", get(developer_metrics))
    .route("/api/v1/metrics/repository/:repository", get(repository_insights))
    .route("/api/v1/metrics/trends", get(quality_trends))
    .layer(CorsLayer::permissive())
    .with_state(state)
}
