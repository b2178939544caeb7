//! Concurrent TTL cache with per-entry expiry
//!
//! Shields providers from repeated load between refreshes. Each entry expires
//! independently at the deadline given on insert; expiry is checked on read
//! (pull-based) rather than by a background sweeper, and an entry observed to
//! be expired is dropped lazily. The key space is small (one entry per
//! provider listing plus one per provider/movie detail), so no capacity bound
//! is applied.
//!
//! Concurrent `get`/`insert` on the same key from racing fetch tasks is safe;
//! two callers that both miss and both fetch resolve last-write-wins, with no
//! request coalescing. Provider errors are never cached.

use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// Key prefix for per-provider listing entries
const PREFIX_LIST: &str = "list";
/// Key prefix for per-provider, per-movie detail entries
const PREFIX_DETAIL: &str = "detail";

/// Cache key for a provider's full listing: `list:<provider>`
pub fn list_key(provider: &str) -> String {
    format!("{}:{}", PREFIX_LIST, provider.to_lowercase())
}

/// Cache key for one provider's movie detail: `detail:<provider>:<id>`
pub fn detail_key(provider: &str, id: &str) -> String {
    format!("{}:{}:{}", PREFIX_DETAIL, provider.to_lowercase(), id)
}

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Generic key-value store with independent time-to-live per entry
pub struct TtlCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
}

impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> TtlCache<V> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Number of stored entries, counting expired ones not yet observed
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone> TtlCache<V> {
    /// Look up a live value
    ///
    /// Returns `None` once `now >= expires_at`, even if the entry was never
    /// removed. An expired entry is dropped on observation.
    pub fn get(&self, key: &str) -> Option<V> {
        let expired = match self.entries.get(key) {
            Some(entry) if Instant::now() < entry.expires_at => {
                debug!(key, "cache hit");
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            // Re-check under the entry lock: a racing insert may have
            // refreshed the deadline since the read above.
            self.entries
                .remove_if(key, |_, entry| Instant::now() >= entry.expires_at);
        }
        debug!(key, "cache miss");
        None
    }

    /// Store a value that expires `ttl` from now, replacing any previous entry
    pub fn insert(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        debug!(key = %key, ttl_ms = ttl.as_millis() as u64, "cache set");
        self.entries.insert(
            key,
            CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }
}
