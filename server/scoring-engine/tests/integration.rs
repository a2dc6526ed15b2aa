//! Integration tests for the scoring engine.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use scoring_engine::error::AnalysisResult;
use scoring_engine::{
  rules, score, AnalysisError, AnalysisSource, ClarityRating, Dimension, PrSubmission, Rating,
  ScoringConfig, ScoringEngine, TextAnalyzer,
};

fn oauth_submission() -> PrSubmission {
  let json = r#"{
    "id": "123",
    "title": "feat: add OAuth2 login",
    "description": "feat: this change fixes the broken login redirect by adding an OAuth2 provider and token refresh handling for users.",
    "files": [
      {"filename": "src/auth.py", "status": "added"},
      {"filename": "test_login.py", "status": "added"},
      {"filename": "src/settings.py", "status": "modified"}
    ],
    "tests": [{"filename": "test_login.py", "status": "added"}],
    "ticket_context": {
      "ticket_id": "AUTH-123",
      "status": "In Progress",
      "issue_type": "Story",
      "priority": "High"
    }
  }"#;
  serde_json::from_str(json).unwrap()
}

/// Returns whatever it was built with, for both calls.
struct Stub {
  clarity: AnalysisResult<f64>,
  suggestions: Option<Vec<String>>,
}

#[async_trait]
impl TextAnalyzer for Stub {
  fn name(&self) -> &str {
    "stub"
  }

  async fn rate_clarity(&self, _title: &str, _description: &str) -> AnalysisResult<ClarityRating> {
    match &self.clarity {
      Ok(v) => ClarityRating::new(*v),
      Err(_) => Err(AnalysisError::Api {
        status: 500,
        message: "boom".into(),
      }),
    }
  }

  async fn suggest_improvements(
    &self,
    _low: &[Dimension],
    _title: &str,
    _description: &str,
  ) -> AnalysisResult<Vec<String>> {
    self
      .suggestions
      .clone()
      .ok_or_else(|| AnalysisError::Parse("expected a JSON array".into()))
  }
}

/// Never answers.
struct Hanging;

#[async_trait]
impl TextAnalyzer for Hanging {
  fn name(&self) -> &str {
    "hanging"
  }

  async fn rate_clarity(&self, _title: &str, _description: &str) -> AnalysisResult<ClarityRating> {
    std::future::pending().await
  }

  async fn suggest_improvements(
    &self,
    _low: &[Dimension],
    _title: &str,
    _description: &str,
  ) -> AnalysisResult<Vec<String>> {
    std::future::pending().await
  }
}

#[tokio::test]
async fn minimal_submission_scores_poor() {
  let engine = ScoringEngine::with_defaults();
  let sub = PrSubmission::new("1", "fix", "");
  let result = engine.calculate_score(&sub).await.unwrap();

  assert_eq!(result.breakdown.clarity, 5.0);
  assert_eq!(result.breakdown.context, 2.0);
  assert_eq!(result.breakdown.completeness, 5.0);
  assert_eq!(result.breakdown.jira_link, 0.0);
  // 5.0*0.3 + 2.0*0.25 + 5.0*0.25 + 0 = 3.25, a tie rounded to even.
  assert_eq!(result.total_score, 3.2);
  assert_eq!(result.rating, Rating::Poor);
  assert_eq!(result.sources.clarity, AnalysisSource::Rules);
}

#[tokio::test]
async fn well_formed_submission_scores_excellent() {
  let sub = oauth_submission();
  assert!(sub.description.chars().count() > 100 && sub.description.chars().count() <= 300);

  let engine = ScoringEngine::with_defaults();
  let result = engine.calculate_score(&sub).await.unwrap();

  assert_eq!(result.breakdown.clarity, 10.0);
  assert_eq!(result.breakdown.context, 9.5);
  assert_eq!(result.breakdown.completeness, 10.0);
  assert_eq!(result.breakdown.jira_link, 10.0);
  assert_eq!(result.total_score, 9.9);
  assert_eq!(result.rating, Rating::Excellent);
  assert_eq!(
    result.suggestions,
    vec!["Great job! This PR meets all quality standards.".to_string()]
  );
}

#[test]
fn unrounded_total_matches_weighted_sum() {
  let sub = oauth_submission();
  let config = ScoringConfig::default();
  let breakdown = scoring_engine::ScoreBreakdown {
    clarity: rules::fallback_clarity(&sub.title, &sub.description),
    context: rules::context(&sub.description, sub.files.len()),
    completeness: rules::completeness(&sub),
    jira_link: rules::ticket_link(sub.ticket_context.as_ref()),
  };
  let total = score::weighted_total(&breakdown, &config.weights);
  assert!((total - 9.875).abs() < 1e-9);
}

#[tokio::test]
async fn out_of_range_clarity_falls_back_to_rules() {
  let engine = ScoringEngine::with_defaults().with_analyzer(Arc::new(Stub {
    clarity: Ok(42.0),
    suggestions: None,
  }));
  let result = engine
    .calculate_score(&PrSubmission::new("1", "fix", ""))
    .await
    .unwrap();
  assert_eq!(result.breakdown.clarity, 5.0);
  assert_eq!(result.sources.clarity, AnalysisSource::Rules);
}

#[tokio::test]
async fn failed_clarity_call_falls_back_to_rules() {
  let engine = ScoringEngine::with_defaults().with_analyzer(Arc::new(Stub {
    clarity: Err(AnalysisError::Unavailable),
    suggestions: None,
  }));
  let result = engine
    .calculate_score(&PrSubmission::new("1", "fix", ""))
    .await
    .unwrap();
  assert_eq!(result.breakdown.clarity, 5.0);
}

#[tokio::test]
async fn ai_suggestions_replace_the_table() {
  let ai = vec!["Explain why the change is needed".to_string(), "Link a ticket".to_string()];
  let engine = ScoringEngine::with_defaults().with_analyzer(Arc::new(Stub {
    clarity: Ok(6.0),
    suggestions: Some(ai.clone()),
  }));
  let result = engine
    .calculate_score(&PrSubmission::new("1", "fix", ""))
    .await
    .unwrap();
  assert_eq!(result.suggestions, ai);
  assert_eq!(result.sources.clarity, AnalysisSource::Ai);
  assert_eq!(result.sources.suggestions, AnalysisSource::Ai);
}

#[tokio::test]
async fn disabled_ai_suggestions_use_the_table() {
  let config = ScoringConfig {
    ai_suggestions: false,
    ..ScoringConfig::default()
  };
  let engine = ScoringEngine::new(config).with_analyzer(Arc::new(Stub {
    clarity: Ok(6.0),
    suggestions: Some(vec!["ignored".to_string()]),
  }));
  let result = engine
    .calculate_score(&PrSubmission::new("1", "fix", ""))
    .await
    .unwrap();
  assert_eq!(result.sources.suggestions, AnalysisSource::Rules);
  assert_eq!(
    result.suggestions,
    vec![
      "Consider adding a more descriptive title and detailed description".to_string(),
      "Provide more context about why this change is needed".to_string(),
      "Add tests and update documentation if needed".to_string(),
      "Link this PR to the relevant Jira ticket".to_string(),
    ]
  );
}

#[tokio::test]
async fn hanging_analyzer_is_bounded_by_timeout() {
  let config = ScoringConfig {
    analyzer_timeout: Duration::from_millis(20),
    ..ScoringConfig::default()
  };
  let engine = ScoringEngine::new(config).with_analyzer(Arc::new(Hanging));
  let result = engine
    .calculate_score(&PrSubmission::new("1", "fix", ""))
    .await
    .unwrap();
  assert_eq!(result.breakdown.clarity, 5.0);
  assert_eq!(result.sources.clarity, AnalysisSource::Rules);
  assert_eq!(result.sources.suggestions, AnalysisSource::Rules);
  assert_eq!(result.suggestions.len(), 4);
}

#[tokio::test]
async fn ticket_link_zero_iff_no_ticket() {
  let engine = ScoringEngine::with_defaults();
  let mut sub = oauth_submission();
  let linked = engine.calculate_score(&sub).await.unwrap();
  assert!(linked.breakdown.jira_link >= 5.0 && linked.breakdown.jira_link <= 10.0);

  sub.ticket_context = None;
  let unlinked = engine.calculate_score(&sub).await.unwrap();
  assert_eq!(unlinked.breakdown.jira_link, 0.0);
}

#[tokio::test]
async fn scoring_does_not_mutate_input() {
  let engine = ScoringEngine::with_defaults();
  let sub = oauth_submission();
  let before = serde_json::to_string(&sub).unwrap();
  engine.calculate_score(&sub).await.unwrap();
  assert_eq!(serde_json::to_string(&sub).unwrap(), before);
}

#[tokio::test]
async fn result_serializes_with_fixed_breakdown_keys() {
  let engine = ScoringEngine::with_defaults();
  let result = engine.calculate_score(&oauth_submission()).await.unwrap();
  let json = serde_json::to_value(&result).unwrap();
  let breakdown = json["breakdown"].as_object().unwrap();
  let mut keys: Vec<_> = breakdown.keys().cloned().collect();
  keys.sort();
  assert_eq!(keys, vec!["clarity", "completeness", "context", "jira_link"]);
  assert_eq!(json["rating"], "excellent");
}
