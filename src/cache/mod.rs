//! Time-bounded response cache.
//!
//! [`TtlCache`] maps a subject key (for the gateway: the city exactly as the
//! caller sent it) to a cached value. Every entry lives for the same fixed
//! time-to-live, counted from its last insertion. There is no size bound and
//! no eviction order; expiry is the only way an entry disappears.
//!
//! Expiry is enforced on read: an entry whose TTL has elapsed is never
//! returned, even if moka's housekeeping has not physically removed it yet.
//!
//! # Future extensibility: bounded growth
//!
//! Entries that are never read again stay resident until moka's background
//! maintenance sweeps them. Should memory become a concern, a maximum entry
//! count can be set on the moka builder in [`TtlCache::new`]; moka then evicts
//! using TinyLFU. Not done here so that a hot key never disappears before
//! its TTL.

use std::time::Duration;

use moka::sync::Cache;

use crate::types::WeatherReport;

/// Default time-to-live for cached entries (10 minutes).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(600);

/// Longest TTL the backing store accepts (1000 years).
pub const MAX_CACHE_TTL: Duration = Duration::from_secs(1000 * 365 * 24 * 3600);

/// Configuration for a [`TtlCache`].
///
/// ```rust
/// # use weathergate::cache::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new().ttl(Duration::from_secs(60));
/// assert_eq!(config.ttl, Duration::from_secs(60));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Time-to-live applied to every entry. Default: 10 minutes.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_CACHE_TTL,
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the time-to-live for cached entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Thread-safe key/value store with a fixed per-store TTL.
///
/// At most one entry exists per key. [`insert`](Self::insert) fully replaces
/// both the value and its expiry; values are never merged.
pub struct TtlCache<V> {
    entries: Cache<String, V>,
    ttl: Duration,
}

/// Cache of normalized weather reports keyed by city.
pub type WeatherCache = TtlCache<WeatherReport>;

impl<V> TtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create an empty cache with the given configuration.
    ///
    /// A TTL above [`MAX_CACHE_TTL`] is clamped to it.
    pub fn new(config: &CacheConfig) -> Self {
        let ttl = config.ttl.min(MAX_CACHE_TTL);
        let entries = Cache::builder().time_to_live(ttl).build();
        Self { entries, ttl }
    }

    /// Create an empty cache with the given TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self::new(&CacheConfig::new().ttl(ttl))
    }

    /// Look up a live entry. Returns `None` on miss or once the TTL has elapsed.
    pub fn get(&self, key: &str) -> Option<V> {
        self.entries.get(key)
    }

    /// Insert or replace the entry for `key`, restarting its TTL.
    pub fn insert(&self, key: impl Into<String>, value: V) {
        self.entries.insert(key.into(), value);
    }

    /// The TTL applied to every entry.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of live entries.
    ///
    /// Flushes moka's pending maintenance first so expired entries are not
    /// counted.
    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Evict all entries.
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }
}

impl<V> Default for TtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ttl_is_ten_minutes() {
        let cache: TtlCache<u32> = TtlCache::default();
        assert_eq!(cache.ttl(), Duration::from_secs(600));
    }

    #[test]
    fn oversized_ttl_is_clamped() {
        let cache: TtlCache<u32> = TtlCache::with_ttl(Duration::from_secs(u64::MAX));
        assert_eq!(cache.ttl(), MAX_CACHE_TTL);
        cache.insert("a", 1);
        assert_eq!(cache.get("a"), Some(1));
    }

    #[test]
    fn keys_are_case_sensitive() {
        let cache = TtlCache::with_ttl(Duration::from_secs(60));
        cache.insert("london", 1u32);
        assert_eq!(cache.get("london"), Some(1));
        assert_eq!(cache.get("London"), None);
    }

    #[test]
    fn clear_empties_cache() {
        let cache = TtlCache::with_ttl(Duration::from_secs(60));
        cache.insert("a", 1u32);
        cache.insert("b", 2u32);
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.get("a").is_none());
        assert!(cache.is_empty());
    }
}
