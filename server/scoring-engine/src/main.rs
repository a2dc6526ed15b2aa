//! Binary entrypoint: read one submission JSON from stdin, write one ScoringResult to stdout.

use std::sync::Arc;

use scoring_engine::{OpenAiAnalyzer, OpenAiConfig, PrSubmission, ScoringConfig, ScoringEngine};
use tokio::io::{self, AsyncReadExt, AsyncWriteExt};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "scoring_engine=info".into()),
    )
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();

  if let Err(e) = run_binary().await {
    eprintln!("scoring-engine error: {}", e);
    std::process::exit(1);
  }
}

async fn run_binary() -> Result<(), Box<dyn std::error::Error>> {
  let mut raw = String::new();
  io::stdin().read_to_string(&mut raw).await?;
  let submission: PrSubmission = serde_json::from_str(&raw)?;

  let mut engine = ScoringEngine::new(ScoringConfig::from_env()?);
  if let Some(openai) = OpenAiConfig::from_env()? {
    engine = engine.with_analyzer(Arc::new(OpenAiAnalyzer::new(openai)?));
  }

  let result = engine.calculate_score(&submission).await?;
  let json = serde_json::to_vec(&result)?;
  io::stdout().write_all(&json).await?;
  io::stdout().flush().await?;
  Ok(())
}
