// # Response Cache Trait
//
// Defines the interface for memoizing remote API responses.
//
// ## Purpose
//
// Identical GET requests issued within a short time window (the host often
// refreshes many resources of one zone back to back) are answered from the
// cache instead of the network.
//
// ## Correctness
//
// The cache is optional. Reconcilers must behave identically with no cache
// configured; its absence only costs extra requests. Clients invalidate the
// key of any entity they write to.
//
// ## Implementations
//
// - In-memory with fixed TTL and bounded size: `MemoryResponseCache`

use async_trait::async_trait;

/// Trait for response cache implementations
///
/// Keys are request signatures (method and path); values are decoded JSON
/// response bodies.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    /// Look up a cached response
    ///
    /// # Returns
    ///
    /// - `Some(Value)`: A response stored within the expiry window
    /// - `None`: Nothing cached or the entry expired
    async fn get(&self, key: &str) -> Option<serde_json::Value>;

    /// Store a response under `key`, replacing any existing entry
    async fn set(&self, key: &str, value: serde_json::Value);

    /// Drop the entry for `key` (no-op if absent)
    async fn invalidate(&self, key: &str);
}
