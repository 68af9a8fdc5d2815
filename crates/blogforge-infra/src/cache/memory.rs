//! In-memory cache implementation - used when Redis is not configured.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use blogforge_core::ports::{Cache, CacheError};

/// Every this many writes, `set` sweeps all expired entries.
const SWEEP_EVERY: u64 = 64;

struct CacheEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|exp| now >= exp)
    }
}

/// In-memory cache using a simple HashMap with async RwLock.
///
/// Expired entries are dropped on the next read of the same key, and in bulk
/// every `SWEEP_EVERY` writes, so keys that are never read again do not
/// pile up. Data is lost on process restart.
pub struct InMemoryCache {
    store: RwLock<HashMap<String, CacheEntry>>,
    writes: AtomicU64,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
            writes: AtomicU64::new(0),
        }
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Instant::now();
        {
            let store = self.store.read().await;
            match store.get(key) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }

        let mut store = self.store.write().await;
        // Re-check: a writer may have refreshed the key in between.
        if store.get(key).is_some_and(|e| e.is_expired(now)) {
            store.remove(key);
            tracing::trace!(key = %key, "Evicted expired cache entry");
            return Ok(None);
        }
        Ok(store.get(key).map(|e| e.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        let now = Instant::now();
        let expires_at = ttl.map(|d| now + d);
        let sweep = (self.writes.fetch_add(1, Ordering::Relaxed) + 1) % SWEEP_EVERY == 0;

        let mut store = self.store.write().await;
        if sweep {
            let before = store.len();
            store.retain(|_, entry| !entry.is_expired(now));
            tracing::trace!(evicted = before - store.len(), "Swept expired cache entries");
        }
        store.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at,
            },
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = InMemoryCache::new();
        cache.set("post:1", "value1", None).await.unwrap();
        assert_eq!(cache.get("post:1").await.unwrap(), Some("value1".to_string()));
        assert_eq!(cache.get("post:2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_overwrite_replaces_value() {
        let cache = InMemoryCache::new();
        cache.set("post:1", "old", None).await.unwrap();
        cache.set("post:1", "new", None).await.unwrap();
        assert_eq!(cache.get("post:1").await.unwrap(), Some("new".to_string()));
    }

    #[tokio::test]
    async fn test_entry_expires() {
        let cache = InMemoryCache::new();
        cache
            .set("post:1", "value1", Some(Duration::from_millis(20)))
            .await
            .unwrap();
        assert!(cache.get("post:1").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(cache.get("post:1").await.unwrap(), None);
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_writes_sweep_unread_expired_entries() {
        let cache = InMemoryCache::new();
        for i in 0..10 {
            cache
                .set(&format!("post:stale-{i}"), "old", Some(Duration::from_millis(10)))
                .await
                .unwrap();
        }
        tokio::time::sleep(Duration::from_millis(30)).await;

        // The stale keys are never read; only further writes run.
        for i in 10..SWEEP_EVERY {
            cache
                .set(&format!("post:fresh-{i}"), "new", Some(Duration::from_secs(3600)))
                .await
                .unwrap();
        }

        assert_eq!(cache.len().await, (SWEEP_EVERY - 10) as usize);
        assert_eq!(cache.get("post:fresh-10").await.unwrap(), Some("new".to_string()));
    }

    #[tokio::test]
    async fn test_sweep_keeps_live_entries() {
        let cache = InMemoryCache::new();
        cache.set("post:pinned", "kept", None).await.unwrap();
        for i in 1..SWEEP_EVERY {
            cache.set(&format!("post:{i}"), "v", None).await.unwrap();
        }

        assert_eq!(cache.len().await, SWEEP_EVERY as usize);
        assert_eq!(cache.get("post:pinned").await.unwrap(), Some("kept".to_string()));
    }
}
