//! Binary entrypoint for the quality API.

use std::sync::Arc;

use metrics_engine::MetricsEngine;
use scoring_engine::{OpenAiAnalyzer, OpenAiConfig, ScoringConfig, ScoringEngine};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quality_api::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "quality_api=info,scoring_engine=info,metrics_engine=info".into()),
    )
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();

  let addr = std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "127.0.0.1:5005".into());

  let mut scoring = ScoringEngine::new(ScoringConfig::from_env()?);
  match OpenAiConfig::from_env()? {
    Some(openai) => {
      info!(model = %openai.model, "text analysis enabled");
      scoring = scoring.with_analyzer(Arc::new(OpenAiAnalyzer::new(openai)?));
    }
    None => warn!("OPENAI_API_KEY not set; using rule-based analysis only"),
  }
  let config = scoring.config();
  info!(
    ai_suggestions = config.ai_suggestions,
    analyzer_timeout_secs = config.analyzer_timeout.as_secs(),
    "scoring engine ready"
  );

  let state = Arc::new(AppState {
    scoring,
    metrics: MetricsEngine::with_defaults(),
  });
  let app = quality_api::router(state);

  let listener = tokio::net::TcpListener::bind(&addr).await?;
  info!("quality-api listening on http://{}", listener.local_addr()?);
  axum::serve(listener, app).await?;

  Ok(())
}
