//! PR Quality Metrics Engine: windowed analytics over scored pull requests.
//!
//! Keeps an append-only ledger of score records and answers team, developer,
//! repository and trend queries over a trailing window. Results are memoized
//! per parameter set until the next write.
//!
//! No DB, no network; pure computation + in-memory state.

pub mod cache;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod insights;
pub mod stats;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::MetricsConfig;
pub use engine::{MetricsEngine, MAX_PERIOD_DAYS};
pub use error::MetricsError;
pub use types::{
  Contributor, DeveloperMetrics, ImprovementTrends, Insight, InsightKind, QualityTrends, RatingDistribution,
  RecordContext, RepositoryInsights, RepositoryStats, ScoreRecord, TeamMetrics, TrendBucket, TrendSummary,
  WeeklyScore,
};
