//! Scoring pipeline: sub-scores, weighted total, rating, suggestions.

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::analyzer::TextAnalyzer;
use crate::config::ScoringConfig;
use crate::error::{AnalysisError, AnalysisResult, ScoringError};
use crate::rules;
use crate::score;
use crate::suggest;
use crate::types::*;

/// The scoring engine. Built once by the host and shared by reference.
pub struct ScoringEngine {
  config: ScoringConfig,
  analyzer: Option<Arc<dyn TextAnalyzer>>,
}

impl ScoringEngine {
  /// Rules-only engine.
  pub fn new(config: ScoringConfig) -> Self {
    Self {
      config,
      analyzer: None,
    }
  }

  pub fn with_defaults() -> Self {
    Self::new(ScoringConfig::default())
  }

  pub fn with_analyzer(mut self, analyzer: Arc<dyn TextAnalyzer>) -> Self {
    self.analyzer = Some(analyzer);
    self
  }

  pub fn config(&self) -> &ScoringConfig {
    &self.config
  }

  /// Score one submission. Never mutates it.
  ///
  /// Text-analysis failures fall back to rules; only invalid input or a
  /// non-finite result is returned as an error.
  pub async fn calculate_score(&self, submission: &PrSubmission) -> Result<ScoringResult, ScoringError> {
    if submission.id.trim().is_empty() {
      return Err(ScoringError::invalid_input("id", "must not be empty"));
    }

    let (clarity, clarity_source) = match self.ai_clarity(submission).await {
      Ok(v) => (v, AnalysisSource::Ai),
      Err(e) => {
        self.note_fallback(submission, "clarity", &e);
        (
          rules::fallback_clarity(&submission.title, &submission.description),
          AnalysisSource::Rules,
        )
      }
    };

    let breakdown = ScoreBreakdown {
      clarity,
      context: rules::context(&submission.description, submission.files.len()),
      completeness: rules::completeness(submission),
      jira_link: rules::ticket_link(submission.ticket_context.as_ref()),
    };

    let total = score::weighted_total(&breakdown, &self.config.weights);
    if !total.is_finite() || !breakdown.is_finite() {
      return Err(ScoringError::internal(
        &submission.id,
        format!("non-finite score (total {}, breakdown {:?})", total, breakdown),
      ));
    }

    let rating = score::classify(total, &self.config.thresholds);
    let (suggestions, suggestions_source) = self.suggestions(submission, &breakdown).await;

    let result = ScoringResult {
      submission_id: submission.id.clone(),
      total_score: round1(total),
      rating,
      breakdown: breakdown.rounded(),
      suggestions,
      sources: AnalysisSources {
        clarity: clarity_source,
        suggestions: suggestions_source,
      },
      scored_at: Utc::now(),
    };

    info!(
      submission_id = %result.submission_id,
      score = result.total_score,
      rating = %result.rating,
      "scored submission"
    );
    Ok(result)
  }

  async fn ai_clarity(&self, submission: &PrSubmission) -> AnalysisResult<f64> {
    let analyzer = self.analyzer.as_ref().ok_or(AnalysisError::Unavailable)?;
    let rating = self
      .bounded(analyzer.rate_clarity(&submission.title, &submission.description))
      .await?;
    Ok(rating.value())
  }

  async fn suggestions(
    &self,
    submission: &PrSubmission,
    breakdown: &ScoreBreakdown,
  ) -> (Vec<String>, AnalysisSource) {
    let low = suggest::low_dimensions(breakdown, self.config.suggestion_threshold);
    if low.is_empty() {
      return (vec![suggest::ALL_CLEAR.to_string()], AnalysisSource::Rules);
    }

    match self.ai_suggestions(submission, &low).await {
      Ok(list) => (list, AnalysisSource::Ai),
      Err(e) => {
        self.note_fallback(submission, "suggestions", &e);
        (suggest::fallback_suggestions(&low), AnalysisSource::Rules)
      }
    }
  }

  async fn ai_suggestions(&self, submission: &PrSubmission, low: &[Dimension]) -> AnalysisResult<Vec<String>> {
    if !self.config.ai_suggestions {
      return Err(AnalysisError::Unavailable);
    }
    let analyzer = self.analyzer.as_ref().ok_or(AnalysisError::Unavailable)?;
    self
      .bounded(analyzer.suggest_improvements(low, &submission.title, &submission.description))
      .await
  }

  /// A missing analyzer or a disabled feature is the normal rules-only path
  /// and is not logged; every real failure is.
  fn note_fallback(&self, submission: &PrSubmission, branch: &'static str, e: &AnalysisError) {
    if matches!(e, AnalysisError::Unavailable) {
      return;
    }
    let analyzer = self.analyzer.as_ref().map_or("none", |a| a.name());
    warn!(
      submission_id = %submission.id,
      analyzer,
      branch,
      error = %e,
      "text analysis fell back to rules"
    );
  }

  /// Apply the configured timeout; the inner future is dropped on expiry.
  async fn bounded<T>(&self, call: impl Future<Output = AnalysisResult<T>>) -> AnalysisResult<T> {
    let limit = self.config.analyzer_timeout;
    tokio::time::timeout(limit, call)
      .await
      .map_err(|_| AnalysisError::Timeout(limit))?
  }
}
