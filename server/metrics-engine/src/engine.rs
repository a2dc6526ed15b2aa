//! Core engine: append-only ledger of score records plus memoized window queries.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use scoring_engine::{Dimension, PrSubmission, ScoringResult};
use tracing::{debug, info};

use crate::cache::{AggregateCache, CacheKey, Cacheable};
use crate::clock::{Clock, SystemClock};
use crate::config::MetricsConfig;
use crate::error::MetricsError;
use crate::insights;
use crate::stats::{bucketize, mean, round1, Window, WindowStats};
use crate::types::*;

/// Longest window a query may ask for.
pub const MAX_PERIOD_DAYS: u32 = 36_500;

struct Ledger {
  records: Vec<Arc<ScoreRecord>>,
  cache: AggregateCache,
  /// Bumped on every write; a result computed from an older snapshot is not cached.
  generation: u64,
}

/// The metrics engine. Built once by the host and shared by reference.
pub struct MetricsEngine {
  config: MetricsConfig,
  clock: Arc<dyn Clock>,
  ledger: RwLock<Ledger>,
}

impl MetricsEngine {
  pub fn new(config: MetricsConfig, clock: Arc<dyn Clock>) -> Self {
    Self {
      config,
      clock,
      ledger: RwLock::new(Ledger {
        records: Vec::new(),
        cache: AggregateCache::default(),
        generation: 0,
      }),
    }
  }

  pub fn with_defaults() -> Self {
    Self::new(MetricsConfig::default(), Arc::new(SystemClock))
  }

  fn read(&self) -> RwLockReadGuard<'_, Ledger> {
    self.ledger.read().unwrap_or_else(PoisonError::into_inner)
  }

  fn write(&self) -> RwLockWriteGuard<'_, Ledger> {
    self.ledger.write().unwrap_or_else(PoisonError::into_inner)
  }

  // -------------------------------------------------------------------------
  // Writes
  // -------------------------------------------------------------------------

  /// Append a record and drop every cached aggregate.
  pub fn record(&self, record: ScoreRecord) -> Result<ScoreRecord, MetricsError> {
    validate(&record)?;

    let stored = Arc::new(record);
    {
      let mut ledger = self.write();
      ledger.records.push(Arc::clone(&stored));
      ledger.cache.clear();
      ledger.generation += 1;
    }

    info!(
      record_id = %stored.record_id,
      submission_id = %stored.submission_id,
      repository = %stored.repository,
      score = stored.total_score,
      "recorded score"
    );
    Ok((*stored).clone())
  }

  /// Build a record from a scoring run, stamped with the engine clock, and append it.
  pub fn record_analysis(
    &self,
    submission: &PrSubmission,
    result: &ScoringResult,
    context: RecordContext,
  ) -> Result<ScoreRecord, MetricsError> {
    let record = ScoreRecord::from_scoring(submission, result, context, self.clock.now());
    self.record(record)
  }

  /// Replace the ledger with records reloaded from durable storage.
  ///
  /// Records are taken as-is; queries report any that are malformed.
  pub fn restore(&self, records: Vec<ScoreRecord>) {
    let count = records.len();
    let mut ledger = self.write();
    ledger.records = records.into_iter().map(Arc::new).collect();
    ledger.cache.clear();
    ledger.generation += 1;
    info!(count, "restored ledger");
  }

  /// The ledger in insertion order, for persistence.
  pub fn snapshot(&self) -> Vec<ScoreRecord> {
    self.read().records.iter().map(|r| (**r).clone()).collect()
  }

  pub fn len(&self) -> usize {
    self.read().records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Number of memoized query results currently held.
  pub fn cached_entries(&self) -> usize {
    self.read().cache.len()
  }

  // -------------------------------------------------------------------------
  // Queries
  // -------------------------------------------------------------------------

  pub fn team_metrics(
    &self,
    team_name: &str,
    period_days: u32,
    repository_filter: Option<&str>,
  ) -> Result<TeamMetrics, MetricsError> {
    const QUERY: &str = "team_metrics";
    check_period(period_days)?;
    let key = CacheKey::Team {
      team: team_name.to_string(),
      period_days,
      repository: repository_filter.map(str::to_string),
    };
    let now = self.clock.now();
    let current = Window::ending_at(now, period_days);
    let previous = current.preceding();
    let in_scope = |r: &ScoreRecord| {
      repository_filter.map_or(true, |repo| r.repository == repo)
        && (current.contains(&r.analyzed_at) || previous.contains(&r.analyzed_at))
    };

    self.memoized(key, QUERY, period_days, in_scope, |records| {
      let cur: Vec<&ScoreRecord> = records
        .iter()
        .copied()
        .filter(|r| current.contains(&r.analyzed_at))
        .collect();
      let prev: Vec<&ScoreRecord> = records
        .iter()
        .copied()
        .filter(|r| previous.contains(&r.analyzed_at))
        .collect();
      Ok(self.build_team(team_name, &current, &cur, &prev))
    })
  }

  pub fn developer_metrics(&self, developer_name: &str, period_days: u32) -> Result<DeveloperMetrics, MetricsError> {
    const QUERY: &str = "developer_metrics";
    check_period(period_days)?;
    let key = CacheKey::Developer {
      developer: developer_name.to_string(),
      period_days,
    };
    let window = Window::ending_at(self.clock.now(), period_days);
    let in_scope = |r: &ScoreRecord| r.author == developer_name && window.contains(&r.analyzed_at);

    self.memoized(key, QUERY, period_days, in_scope, |records| {
      Ok(self.build_developer(developer_name, period_days, &window, records))
    })
  }

  pub fn repository_insights(&self, repository: &str, period_days: u32) -> Result<RepositoryInsights, MetricsError> {
    const QUERY: &str = "repository_insights";
    check_period(period_days)?;
    let key = CacheKey::Repository {
      repository: repository.to_string(),
      period_days,
    };
    let window = Window::ending_at(self.clock.now(), period_days);
    let in_scope = |r: &ScoreRecord| r.repository == repository && window.contains(&r.analyzed_at);

    self.memoized(key, QUERY, period_days, in_scope, |records| {
      let stats = WindowStats::compute(records);
      Ok(RepositoryInsights {
        repository: repository.to_string(),
        period_days,
        total_prs: count_u32(records.len()),
        insights: stats
          .as_ref()
          .map(|s| insights::repository_insights(s, &self.config))
          .unwrap_or_default(),
        stats: stats.map(|s| RepositoryStats {
          average_score: round1(s.average_score),
          test_coverage: round1(s.test_coverage),
          jira_compliance: round1(s.ticket_compliance),
          average_file_count: round1(s.average_file_count),
        }),
      })
    })
  }

  pub fn quality_trends(&self, period_days: u32) -> Result<QualityTrends, MetricsError> {
    const QUERY: &str = "quality_trends";
    check_period(period_days)?;
    let key = CacheKey::Trends { period_days };
    let window = Window::ending_at(self.clock.now(), period_days);
    let in_scope = |r: &ScoreRecord| window.contains(&r.analyzed_at);

    self.memoized(key, QUERY, period_days, in_scope, |records| {
      let summary = match WindowStats::compute(records) {
        Some(s) => s,
        None => {
          return Ok(QualityTrends {
            trends: Vec::new(),
            summary: None,
          })
        }
      };

      let trends = bucketize(records, &window, self.config.bucket_days)
        .into_iter()
        .filter_map(|(week_start, bucket)| {
          WindowStats::compute(&bucket).map(|s| TrendBucket {
            week_start,
            pr_count: count_u32(s.count),
            average_score: round1(s.average_score),
            test_coverage: round1(s.test_coverage),
            jira_compliance: round1(s.ticket_compliance),
          })
        })
        .collect();

      Ok(QualityTrends {
        trends,
        summary: Some(TrendSummary {
          total_prs: count_u32(summary.count),
          average_score: round1(summary.average_score),
          test_coverage: round1(summary.test_coverage),
          jira_compliance: round1(summary.ticket_compliance),
          period_days,
        }),
      })
    })
  }

  /// Serve from the cache, or snapshot matching records under the read lock,
  /// aggregate without holding it, and cache the result if no write intervened.
  fn memoized<T: Cacheable>(
    &self,
    key: CacheKey,
    query: &'static str,
    period_days: u32,
    in_scope: impl Fn(&ScoreRecord) -> bool,
    compute: impl FnOnce(&[&ScoreRecord]) -> Result<T, MetricsError>,
  ) -> Result<T, MetricsError> {
    let (snapshot, generation) = {
      let ledger = self.read();
      if let Some(hit) = ledger.cache.get::<T>(&key) {
        debug!(query, ?key, "cache hit");
        return Ok(hit);
      }
      let snapshot: Vec<Arc<ScoreRecord>> = ledger
        .records
        .iter()
        .filter(|r| in_scope(r))
        .cloned()
        .collect();
      (snapshot, ledger.generation)
    };
    debug!(query, ?key, scanned = snapshot.len(), "cache miss");

    if let Some(bad) = snapshot.iter().find(|r| !r.is_well_formed()) {
      return Err(MetricsError::aggregation(
        query,
        period_days,
        format!("record {} has non-finite values", bad.record_id),
      ));
    }

    let refs: Vec<&ScoreRecord> = snapshot.iter().map(|r| r.as_ref()).collect();
    let result = compute(&refs)?;

    let mut ledger = self.write();
    if ledger.generation == generation {
      ledger.cache.insert(key, result.clone());
    }
    Ok(result)
  }

  // -------------------------------------------------------------------------
  // Builders
  // -------------------------------------------------------------------------

  fn build_team(
    &self,
    team_name: &str,
    window: &Window,
    current: &[&ScoreRecord],
    previous: &[&ScoreRecord],
  ) -> TeamMetrics {
    let stats = match WindowStats::compute(current) {
      Some(s) => s,
      None => {
        return TeamMetrics {
          team_name: team_name.to_string(),
          period_start: window.start,
          period_end: window.end,
          total_prs: 0,
          average_score: 0.0,
          score_distribution: RatingDistribution::default(),
          average_review_time_hours: None,
          average_file_count: 0.0,
          test_coverage_percentage: 0.0,
          jira_link_compliance: 0.0,
          top_contributors: Vec::new(),
          improvement_trends: ImprovementTrends::default(),
        }
      }
    };

    let mut distribution = RatingDistribution::default();
    for r in current {
      distribution.add(r.rating);
    }

    let improvement_trends = match WindowStats::compute(previous) {
      Some(prev) => ImprovementTrends {
        score_change: Some(stats.average_score - prev.average_score),
        test_coverage_change: Some(stats.test_coverage - prev.test_coverage),
      },
      None => ImprovementTrends::default(),
    };

    TeamMetrics {
      team_name: team_name.to_string(),
      period_start: window.start,
      period_end: window.end,
      total_prs: count_u32(stats.count),
      average_score: round1(stats.average_score),
      score_distribution: distribution,
      average_review_time_hours: mean(current.iter().filter_map(|r| r.review_time_hours)).map(round1),
      average_file_count: round1(stats.average_file_count),
      test_coverage_percentage: round1(stats.test_coverage),
      jira_link_compliance: round1(stats.ticket_compliance),
      top_contributors: top_contributors(current, self.config.top_contributors),
      improvement_trends,
    }
  }

  fn build_developer(
    &self,
    developer_name: &str,
    period_days: u32,
    window: &Window,
    records: &[&ScoreRecord],
  ) -> DeveloperMetrics {
    let mut metrics = DeveloperMetrics {
      developer_name: developer_name.to_string(),
      period_start: window.start,
      period_end: window.end,
      total_prs: 0,
      average_score: 0.0,
      score_trend: Vec::new(),
      strengths: Vec::new(),
      improvement_areas: Vec::new(),
      productivity_score: 0.0,
      quality_score: 0.0,
      collaboration_score: 0.0,
    };
    let average_score = match mean(records.iter().map(|r| r.total_score)) {
      Some(v) => v,
      None => return metrics,
    };

    metrics.total_prs = count_u32(records.len());
    metrics.average_score = round1(average_score);
    metrics.score_trend = weekly_trend(records, window, self.config.bucket_days);

    for dimension in Dimension::ALL {
      let dim_mean = mean(records.iter().map(|r| r.breakdown.get(dimension))).unwrap_or(0.0);
      if dim_mean >= self.config.strength_threshold {
        metrics.strengths.push(dimension.as_str().to_string());
      }
      if dim_mean < self.config.improvement_threshold {
        metrics.improvement_areas.push(dimension.as_str().to_string());
      }
    }

    let per_month = records.len() as f64 / f64::from(period_days) * 30.0;
    metrics.productivity_score = round1((per_month * 10.0).min(10.0));
    metrics.quality_score = round1(average_score);

    let avg_files = mean(records.iter().map(|r| f64::from(r.file_count))).unwrap_or(0.0);
    let avg_comments = mean(records.iter().map(|r| f64::from(r.comment_count))).unwrap_or(0.0);
    let collaboration = (10.0 - avg_files * 0.2) + avg_comments * 0.5;
    metrics.collaboration_score = round1(collaboration.clamp(0.0, 10.0));

    metrics
  }
}

/// Per-author mean score, best first. Ranked on the one-decimal mean that is
/// reported, so authors shown with the same score keep first-seen order.
fn top_contributors(records: &[&ScoreRecord], limit: usize) -> Vec<Contributor> {
  let mut order: Vec<(&str, u32, f64)> = Vec::new();
  for r in records {
    match order.iter_mut().find(|(name, _, _)| *name == r.author) {
      Some(entry) => {
        entry.1 += 1;
        entry.2 += r.total_score;
      }
      None => order.push((r.author.as_str(), 1, r.total_score)),
    }
  }

  let mut ranked: Vec<(&str, u32, f64)> = order
    .into_iter()
    .map(|(name, count, total)| (name, count, round1(total / f64::from(count))))
    .collect();
  // Stable sort: equal means stay in first-seen order.
  ranked.sort_by(|a, b| b.2.total_cmp(&a.2));
  ranked.truncate(limit);

  ranked
    .into_iter()
    .map(|(name, pr_count, average_score)| Contributor {
      name: name.to_string(),
      pr_count,
      average_score,
    })
    .collect()
}

fn weekly_trend(records: &[&ScoreRecord], window: &Window, bucket_days: u32) -> Vec<WeeklyScore> {
  bucketize(records, window, bucket_days)
    .into_iter()
    .filter_map(|(week_start, bucket)| {
      mean(bucket.iter().map(|r| r.total_score)).map(|avg| WeeklyScore {
        week_start,
        average_score: round1(avg),
      })
    })
    .collect()
}

fn validate(record: &ScoreRecord) -> Result<(), MetricsError> {
  if record.submission_id.trim().is_empty() {
    return Err(MetricsError::validation("submission_id", "must not be empty"));
  }
  if record.repository.trim().is_empty() {
    return Err(MetricsError::validation("repository", "must not be empty"));
  }
  if record.author.trim().is_empty() {
    return Err(MetricsError::validation("author", "must not be empty"));
  }
  if !record.is_well_formed() {
    return Err(MetricsError::validation("total_score", "scores must be finite"));
  }
  if record.total_score < 0.0 {
    return Err(MetricsError::validation("total_score", "must not be negative"));
  }
  Ok(())
}

fn check_period(period_days: u32) -> Result<(), MetricsError> {
  if period_days == 0 || period_days > MAX_PERIOD_DAYS {
    return Err(MetricsError::validation(
      "period_days",
      &format!("must be between 1 and {}", MAX_PERIOD_DAYS),
    ));
  }
  Ok(())
}

fn count_u32(n: usize) -> u32 {
  u32::try_from(n).unwrap_or(u32::MAX)
}
