//! Query cache for the content client
//!
//! Responses are cached as raw JSON keyed by request path. Entries expire
//! after the TTL or when a mutation invalidates their path.

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default lifetime of a cached listing
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

struct CachedQuery {
    value: Value,
    expires_at: Instant,
}

pub struct QueryCache {
    entries: DashMap<String, CachedQuery>,
    ttl: Duration,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

impl QueryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Cached value for `path`, if present, fresh and of the expected shape
    pub fn get<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        let hit = {
            let entry = self.entries.get(path)?;
            if entry.expires_at <= Instant::now() {
                None
            } else {
                Some(entry.value.clone())
            }
        };

        match hit {
            Some(value) => serde_json::from_value(value).ok(),
            None => {
                self.entries.remove(path);
                None
            }
        }
    }

    pub fn insert(&self, path: &str, value: Value) {
        self.entries.insert(
            path.to_string(),
            CachedQuery {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Drop the entry for each path
    pub fn invalidate(&self, paths: &[&str]) {
        for path in paths {
            if self.entries.remove(*path).is_some() {
                debug!(path = %path, "query cache invalidated");
            }
        }
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
    use serde_json::json;

    #[test]
    fn test_hit_and_invalidate() {
        let cache = QueryCache::default();
        cache.insert("/api/quotes", json!([{ "id": "1" }]));

        let hit: Vec<Value> = cache.get("/api/quotes").unwrap();
        assert_eq!(hit.len(), 1);

        cache.invalidate(&["/api/quotes", "/api/logs"]);
        assert!(cache.get::<Vec<Value>>("/api/quotes").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_expired_entries_are_evicted() {
        let cache = QueryCache::new(Duration::ZERO);
        cache.insert("/api/logs", json!([]));
        assert!(cache.get::<Vec<Value>>("/api/logs").is_none());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_shape_mismatch_is_a_miss() {
        let cache = QueryCache::default();
        cache.insert("/api/posts", json!({ "not": "a list" }));
        assert!(cache.get::<Vec<Value>>("/api/posts").is_none());
    }
}
