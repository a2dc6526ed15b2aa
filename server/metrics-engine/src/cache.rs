//! Memoized query results, keyed by the full parameter tuple of each query.

use std::collections::HashMap;

use crate::types::{DeveloperMetrics, QualityTrends, RepositoryInsights, TeamMetrics};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
  Team {
    team: String,
    period_days: u32,
    repository: Option<String>,
  },
  Developer {
    developer: String,
    period_days: u32,
  },
  Repository {
    repository: String,
    period_days: u32,
  },
  Trends {
    period_days: u32,
  },
}

#[derive(Debug, Clone)]
pub enum Aggregate {
  Team(TeamMetrics),
  Developer(DeveloperMetrics),
  Repository(RepositoryInsights),
  Trends(QualityTrends),
}

/// A query result that can live in the cache.
pub trait Cacheable: Clone {
  fn into_aggregate(self) -> Aggregate;
  fn from_aggregate(aggregate: &Aggregate) -> Option<&Self>;
}

macro_rules! cacheable {
  ($ty:ty, $variant:ident) => {
    impl Cacheable for $ty {
      fn into_aggregate(self) -> Aggregate {
        Aggregate::$variant(self)
      }

      fn from_aggregate(aggregate: &Aggregate) -> Option<&Self> {
        match aggregate {
          Aggregate::$variant(v) => Some(v),
          _ => None,
        }
      }
    }
  };
}

cacheable!(TeamMetrics, Team);
cacheable!(DeveloperMetrics, Developer);
cacheable!(RepositoryInsights, Repository);
cacheable!(QualityTrends, Trends);

/// Never expires on its own; cleared wholesale by every write to the ledger.
#[derive(Debug, Default)]
pub struct AggregateCache {
  entries: HashMap<CacheKey, Aggregate>,
}

impl AggregateCache {
  pub fn get<T: Cacheable>(&self, key: &CacheKey) -> Option<T> {
    self.entries.get(key).and_then(T::from_aggregate).cloned()
  }

  pub fn insert<T: Cacheable>(&mut self, key: CacheKey, value: T) {
    self.entries.insert(key, value.into_aggregate());
  }

  pub fn clear(&mut self) {
    self.entries.clear();
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn trends() -> QualityTrends {
    QualityTrends {
      trends: vec![],
      summary: None,
    }
  }

  #[test]
  fn keys_differ_by_every_parameter() {
    let a = CacheKey::Team {
      team: "core".into(),
      period_days: 30,
      repository: None,
    };
    let b = CacheKey::Team {
      team: "core".into(),
      period_days: 30,
      repository: Some("api".into()),
    };
    assert_ne!(a, b);
    assert_ne!(
      CacheKey::Trends { period_days: 30 },
      CacheKey::Trends { period_days: 90 }
    );
  }

  #[test]
  fn get_checks_the_variant() {
    let mut cache = AggregateCache::default();
    let key = CacheKey::Trends { period_days: 90 };
    cache.insert(key.clone(), trends());
    assert!(cache.get::<QualityTrends>(&key).is_some());
    assert!(cache.get::<TeamMetrics>(&key).is_none());
    cache.clear();
    assert!(cache.is_empty());
  }
}
