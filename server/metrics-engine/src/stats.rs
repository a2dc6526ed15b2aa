//! Windowing, fixed-width bucketing and the per-window statistics shared by every query.

use chrono::{DateTime, Duration, Utc};

use crate::types::ScoreRecord;

pub use scoring_engine::types::round1;

/// A time window. The current period is closed at both ends; the
/// comparison period preceding it excludes its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
  pub start: DateTime<Utc>,
  pub end: DateTime<Utc>,
  pub end_inclusive: bool,
}

impl Window {
  /// `[now - period_days, now]`.
  pub fn ending_at(now: DateTime<Utc>, period_days: u32) -> Self {
    Self {
      start: now - Duration::days(i64::from(period_days)),
      end: now,
      end_inclusive: true,
    }
  }

  /// The window of the same length immediately before this one, `[start - len, start)`.
  pub fn preceding(&self) -> Self {
    Self {
      start: self.start - (self.end - self.start),
      end: self.start,
      end_inclusive: false,
    }
  }

  pub fn contains(&self, ts: &DateTime<Utc>) -> bool {
    if *ts < self.start {
      return false;
    }
    if self.end_inclusive {
      *ts <= self.end
    } else {
      *ts < self.end
    }
  }
}

/// Split `records` (all inside `window`) into consecutive buckets of
/// `bucket_days` starting at `window.start`. Each record lands in exactly one
/// bucket; a record at the inclusive end joins the last bucket. Empty buckets
/// are omitted. Record order is preserved inside a bucket.
pub fn bucketize<'a>(
  records: &[&'a ScoreRecord],
  window: &Window,
  bucket_days: u32,
) -> Vec<(DateTime<Utc>, Vec<&'a ScoreRecord>)> {
  let width = Duration::days(i64::from(bucket_days.max(1)));
  let width_ms = width.num_milliseconds();
  let span_ms = (window.end - window.start).num_milliseconds().max(0);
  let bucket_count = ((span_ms + width_ms - 1) / width_ms).max(1) as usize;

  let mut buckets: Vec<Vec<&'a ScoreRecord>> = vec![Vec::new(); bucket_count];
  for record in records.iter().copied() {
    let offset_ms = (record.analyzed_at - window.start).num_milliseconds().max(0);
    let idx = ((offset_ms / width_ms) as usize).min(bucket_count - 1);
    buckets[idx].push(record);
  }

  buckets
    .into_iter()
    .enumerate()
    .filter(|(_, b)| !b.is_empty())
    .map(|(i, b)| (window.start + width * i as i32, b))
    .collect()
}

pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
  let mut sum = 0.0;
  let mut n = 0usize;
  for v in values {
    sum += v;
    n += 1;
  }
  if n == 0 {
    None
  } else {
    Some(sum / n as f64)
  }
}

pub fn percentage(hits: usize, total: usize) -> f64 {
  if total == 0 {
    0.0
  } else {
    hits as f64 / total as f64 * 100.0
  }
}

/// Unrounded statistics over a non-empty set of records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
  pub count: usize,
  pub average_score: f64,
  pub average_file_count: f64,
  pub test_coverage: f64,
  pub ticket_compliance: f64,
}

impl WindowStats {
  /// `None` for an empty set.
  pub fn compute(records: &[&ScoreRecord]) -> Option<Self> {
    let count = records.len();
    let average_score = mean(records.iter().map(|r| r.total_score))?;
    let average_file_count = mean(records.iter().map(|r| f64::from(r.file_count)))?;
    Some(Self {
      count,
      average_score,
      average_file_count,
      test_coverage: percentage(records.iter().filter(|r| r.has_tests).count(), count),
      ticket_compliance: percentage(records.iter().filter(|r| r.has_ticket_link).count(), count),
    })
  }
}
