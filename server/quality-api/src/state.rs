//! Shared application state.

use metrics_engine::MetricsEngine;
use scoring_engine::ScoringEngine;

pub struct AppState {
  pub scoring: ScoringEngine,
  pub metrics: MetricsEngine,
}
