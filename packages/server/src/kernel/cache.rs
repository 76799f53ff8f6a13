//! Bounded in-process memo cache.
//!
//! Entries are keyed by exact string, capped by count and expired by age.
//! The cache is owned by whoever constructs it and is passed in, never global.

use std::time::Duration;

use moka::sync::Cache;

/// Size/age limits for a [`MemoCache`].
#[derive(Debug, Clone, Copy)]
pub struct CachePolicy {
    pub max_entries: u64,
    pub ttl: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            max_entries: 1024,
            ttl: Duration::from_secs(3600),
        }
    }
}

/// Thread-safe memo cache with LRU-style eviction and a time-to-live.
#[derive(Clone)]
pub struct MemoCache<V: Clone + Send + Sync + 'static> {
    inner: Cache<String, V>,
}

impl<V: Clone + Send + Sync + 'static> MemoCache<V> {
    pub fn new(policy: CachePolicy) -> Self {
        let inner = Cache::builder()
            .max_capacity(policy.max_entries)
            .time_to_live(policy.ttl)
            .build();
        Self { inner }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.inner.get(key)
    }

    pub fn insert(&self, key: impl Into<String>, value: V) {
        self.inner.insert(key.into(), value);
    }
}

impl<V: Clone + Send + Sync + 'static> Default for MemoCache<V> {
    fn default() -> Self {
        Self::new(CachePolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_key_lookup() {
        let cache: MemoCache<u32> = MemoCache::default();
        cache.insert("desk lamp", 1);

        assert_eq!(cache.get("desk lamp"), Some(1));
        assert_eq!(cache.get("Desk lamp"), None);
        assert_eq!(cache.get("desk lamp "), None);
    }

    #[test]
    fn test_insert_overwrites() {
        let cache: MemoCache<&'static str> = MemoCache::default();
        cache.insert("k", "a");
        cache.insert("k", "b");
        assert_eq!(cache.get("k"), Some("b"));
    }
}
