//! PR quality scoring engine.
//!
//! Turns a pull request submission into a 1-10 composite score from four
//! sub-scores (clarity, context, completeness, ticket link), a rating and
//! improvement suggestions. Clarity and suggestions prefer an external
//! text-analysis call; every failure of that call falls back to the
//! deterministic rules in [`rules`] and [`suggest`].

pub mod analyzer;
pub mod config;
pub mod engine;
pub mod error;
pub mod openai;
pub mod rules;
pub mod score;
pub mod suggest;
pub mod types;

pub use analyzer::{ClarityRating, TextAnalyzer};
pub use config::{RatingThresholds, ScoringConfig, ScoringWeights};
pub use engine::ScoringEngine;
pub use error::{AnalysisError, ScoringError};
pub use openai::{OpenAiAnalyzer, OpenAiConfig};
pub use rules::has_test_files;
pub use types::{
  AnalysisSource, Dimension, FileChange, FileStatus, PrSubmission, Rating, ScoreBreakdown,
  ScoringResult, TicketContext,
};
