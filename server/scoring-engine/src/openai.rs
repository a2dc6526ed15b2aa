//! Chat-completions backed [`TextAnalyzer`].
//!
//! Reads `OPENAI_API_KEY`, `OPENAI_MODEL`, `OPENAI_TEMPERATURE` and
//! `OPENAI_BASE_URL`. Without an API key no analyzer is built and the
//! engine scores with rules only.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analyzer::{parse_clarity_reply, parse_suggestions_reply, ClarityRating, TextAnalyzer};
use crate::error::{AnalysisError, AnalysisResult, ScoringError};
use crate::types::Dimension;

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
  pub api_key: String,
  pub model: String,
  pub temperature: f32,
  pub base_url: String,
  /// Transport-level timeout; the engine applies its own bound on top.
  pub request_timeout: Duration,
}

impl OpenAiConfig {
  pub fn new(api_key: impl Into<String>) -> Self {
    Self {
      api_key: api_key.into(),
      model: "gpt-4-turbo".to_string(),
      temperature: 0.3,
      base_url: "https://api.openai.com/v1".to_string(),
      request_timeout: Duration::from_secs(30),
    }
  }

  /// `Ok(None)` when `OPENAI_API_KEY` is unset or empty.
  pub fn from_env() -> Result<Option<Self>, ScoringError> {
    let api_key = match env::var("OPENAI_API_KEY") {
      Ok(k) if !k.trim().is_empty() => k,
      _ => return Ok(None),
    };
    let mut config = Self::new(api_key);
    if let Ok(model) = env::var("OPENAI_MODEL") {
      config.model = model;
    }
    if let Ok(raw) = env::var("OPENAI_TEMPERATURE") {
      config.temperature = raw
        .trim()
        .parse()
        .map_err(|_| ScoringError::config("OPENAI_TEMPERATURE", "expected a float"))?;
    }
    if let Ok(url) = env::var("OPENAI_BASE_URL") {
      config.base_url = url.trim_end_matches('/').to_string();
    }
    Ok(Some(config))
  }
}

pub struct OpenAiAnalyzer {
  config: OpenAiConfig,
  http: Client,
}

impl OpenAiAnalyzer {
  pub fn new(config: OpenAiConfig) -> AnalysisResult<Self> {
    let http = Client::builder().timeout(config.request_timeout).build()?;
    Ok(Self { config, http })
  }

  async fn complete(&self, prompt: String, max_tokens: u32, temperature: f32) -> AnalysisResult<String> {
    let body = ChatRequest {
      model: &self.config.model,
      messages: vec![ChatMessage {
        role: "user",
        content: prompt,
      }],
      max_tokens,
      temperature,
    };

    let response = self
      .http
      .post(format!("{}/chat/completions", self.config.base_url))
      .bearer_auth(&self.config.api_key)
      .json(&body)
      .send()
      .await?;

    let status = response.status();
    if !status.is_success() {
      let message = response.text().await.unwrap_or_default();
      return Err(AnalysisError::Api {
        status: status.as_u16(),
        message,
      });
    }

    let parsed: ChatResponse = response.json().await?;
    let content = parsed
      .choices
      .into_iter()
      .next()
      .map(|c| c.message.content)
      .ok_or_else(|| AnalysisError::Parse("no response choices".into()))?;
    debug!(model = %self.config.model, reply_len = content.len(), "chat completion received");
    Ok(content)
  }
}

#[async_trait]
impl TextAnalyzer for OpenAiAnalyzer {
  fn name(&self) -> &str {
    "openai"
  }

  async fn rate_clarity(&self, title: &str, description: &str) -> AnalysisResult<ClarityRating> {
    let reply = self
      .complete(clarity_prompt(title, description), 10, self.config.temperature)
      .await?;
    parse_clarity_reply(&reply)
  }

  async fn suggest_improvements(
    &self,
    low_dimensions: &[Dimension],
    title: &str,
    description: &str,
  ) -> AnalysisResult<Vec<String>> {
    let reply = self
      .complete(suggestions_prompt(low_dimensions, title, description), 300, 0.7)
      .await?;
    parse_suggestions_reply(&reply)
  }
}

fn clarity_prompt(title: &str, description: &str) -> String {
  format!(
    "Analyze the clarity of this pull request:\n\n\
     Title: {title}\n\
     Description: {description}\n\n\
     Rate the clarity on a scale of 1-10 based on:\n\
     - Clear, descriptive title\n\
     - Well-structured description\n\
     - Proper grammar and spelling\n\
     - Easy to understand intent\n\n\
     Respond with only a number between 1-10."
  )
}

fn suggestions_prompt(low_dimensions: &[Dimension], title: &str, description: &str) -> String {
  let areas: Vec<&str> = low_dimensions.iter().map(|d| d.as_str()).collect();
  format!(
    "Generate 2-3 specific improvement suggestions for a pull request with low scores in: {}.\n\n\
     PR Title: {title}\n\
     PR Description: {description}\n\n\
     Focus on actionable improvements. Keep suggestions concise and helpful.\n\
     Return as a JSON array of strings.",
    areas.join(", ")
  )
}

#[derive(Serialize)]
struct ChatRequest<'a> {
  model: &'a str,
  messages: Vec<ChatMessage>,
  max_tokens: u32,
  temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
  role: &'static str,
  content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
  choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
  message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
  content: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn config_defaults() {
    let config = OpenAiConfig::new("sk-test");
    assert_eq!(config.model, "gpt-4-turbo");
    assert_eq!(config.base_url, "https://api.openai.com/v1");
  }

  #[test]
  fn suggestions_prompt_lists_low_dimensions() {
    let p = suggestions_prompt(&[Dimension::Context, Dimension::JiraLink], "fix", "");
    assert!(p.contains("low scores in: context, jira_link."));
    assert!(p.contains("JSON array of strings"));
  }

  #[test]
  fn clarity_prompt_embeds_title_and_description() {
    let p = clarity_prompt("feat: login", "adds OAuth");
    assert!(p.contains("Title: feat: login"));
    assert!(p.contains("Description: adds OAuth"));
  }
}
