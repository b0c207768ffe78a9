// # Memory Response Cache
//
// In-memory implementation of ResponseCache backed by `moka`.
//
// ## Expiry
//
// Every entry lives for the same TTL, measured from when it was stored.
// The cache holds at most `max_capacity` entries; expired and evicted
// entries are reclaimed by moka's own housekeeping.
//
// ## When to Use
//
// - Short-lived provider processes refreshing many records of one zone
// - Tests that want to observe cache hits

use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;

use crate::traits::response_cache::ResponseCache;

/// Default expiry window for cached responses (10 minutes)
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(600);

/// Default upper bound on cached responses
pub const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

/// In-memory response cache
///
/// Wraps a `moka::future::Cache<String, Value>` where the key is the request
/// signature and the value the decoded response body. Clones share the same
/// entries.
///
/// # Example
///
/// ```rust,no_run
/// use akamai_core::cache::MemoryResponseCache;
/// use akamai_core::traits::ResponseCache;
///
/// #[tokio::main]
/// async fn main() {
///     let cache = MemoryResponseCache::default();
///
///     cache.set("GET /config-dns/v2/zones", serde_json::json!({"zones": []})).await;
///     assert!(cache.get("GET /config-dns/v2/zones").await.is_some());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryResponseCache {
    cache: Cache<String, serde_json::Value>,
}

impl MemoryResponseCache {
    /// Create a new empty cache with the given expiry window
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, DEFAULT_CACHE_CAPACITY)
    }

    /// Create a new empty cache holding at most `max_capacity` entries
    pub fn with_capacity(ttl: Duration, max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();

        Self { cache }
    }

    /// Get the number of live entries
    pub async fn len(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

#[async_trait]
impl ResponseCache for MemoryResponseCache {
    async fn get(&self, key: &str) -> Option<serde_json::Value> {
        let hit = self.cache.get(key).await;
        if hit.is_none() {
            tracing::trace!("Cache miss: {}", key);
        }
        hit
    }

    async fn set(&self, key: &str, value: serde_json::Value) {
        self.cache.insert(key.to_string(), value).await;
    }

    async fn invalidate(&self, key: &str) {
        self.cache.invalidate(key).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_cache_basic() {
        let cache = MemoryResponseCache::default();

        assert!(cache.is_empty().await);

        let body = serde_json::json!({"name": "www", "type": "A"});
        cache.set("GET /a", body.clone()).await;

        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get("GET /a").await, Some(body));

        cache.invalidate("GET /a").await;
        assert!(cache.get("GET /a").await.is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_expired_entries_are_not_served() {
        let cache = MemoryResponseCache::new(Duration::from_millis(50));

        cache.set("GET /a", serde_json::json!(1)).await;
        assert!(cache.get("GET /a").await.is_some());

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(cache.get("GET /a").await.is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_capacity_is_bounded() {
        let cache = MemoryResponseCache::with_capacity(DEFAULT_CACHE_TTL, 8);

        for i in 0..64 {
            cache.set(&format!("GET /records/{}", i), serde_json::json!(i)).await;
        }

        assert!(cache.len().await <= 8);
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let cache = MemoryResponseCache::default();
        let other = cache.clone();

        cache.set("GET /a", serde_json::json!("x")).await;
        assert_eq!(other.get("GET /a").await, Some(serde_json::json!("x")));

        other.invalidate("GET /a").await;
        assert!(cache.get("GET /a").await.is_none());
    }
}
