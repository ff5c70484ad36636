//! Process-lifetime request metrics aggregator.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde::Serialize;

use super::{CACHE_HITS_TOTAL, CACHE_MISSES_TOTAL, REQUEST_DURATION_SECONDS, REQUESTS_TOTAL};

/// Running statistics for one `"METHOD path"` endpoint key.
#[derive(Debug, Clone, Copy)]
struct EndpointStat {
    count: u64,
    total_duration_ms: u64,
    min_duration_ms: u64,
    max_duration_ms: u64,
}

impl EndpointStat {
    fn first(duration_ms: u64) -> Self {
        Self {
            count: 1,
            total_duration_ms: duration_ms,
            min_duration_ms: duration_ms,
            max_duration_ms: duration_ms,
        }
    }

    fn observe(&mut self, duration_ms: u64) {
        self.count += 1;
        self.total_duration_ms = self.total_duration_ms.saturating_add(duration_ms);
        self.min_duration_ms = self.min_duration_ms.min(duration_ms);
        self.max_duration_ms = self.max_duration_ms.max(duration_ms);
    }

    fn snapshot(&self) -> EndpointSnapshot {
        EndpointSnapshot {
            count: self.count,
            avg_duration_ms: (self.total_duration_ms as f64 / self.count as f64).round() as u64,
            min_duration_ms: self.min_duration_ms,
            max_duration_ms: self.max_duration_ms,
        }
    }
}

/// Aggregates request, cache, and error counters for the process lifetime.
///
/// Scalar counters are atomics; the endpoint and error maps sit behind
/// mutexes that are only held for the duration of a single update. All
/// operations are total: they never fail and never block on I/O.
///
/// Aggregation is append-only. There is no reset; construct a new instance
/// instead.
#[derive(Debug)]
pub struct RequestMetrics {
    started: Instant,
    requests: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    endpoints: Mutex<HashMap<String, EndpointStat>>,
    errors: Mutex<BTreeMap<u16, u64>>,
}

impl RequestMetrics {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            requests: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
            endpoints: Mutex::new(HashMap::new()),
            errors: Mutex::new(BTreeMap::new()),
        }
    }

    /// Record one completed request.
    ///
    /// `path` should be the route template (e.g. `/weather/:city`) rather
    /// than the resolved URL, so stats aggregate across parameter values.
    /// Status codes `>= 400` are also tallied as errors.
    pub fn track_request(&self, method: &str, path: &str, status: u16, duration: Duration) {
        let duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        let endpoint = format!("{method} {path}");

        self.requests.fetch_add(1, Ordering::Relaxed);
        {
            let mut endpoints = lock(&self.endpoints);
            match endpoints.get_mut(&endpoint) {
                Some(stat) => stat.observe(duration_ms),
                None => {
                    endpoints.insert(endpoint, EndpointStat::first(duration_ms));
                }
            }
        }
        if status >= 400 {
            *lock(&self.errors).entry(status).or_insert(0) += 1;
        }

        metrics::counter!(
            REQUESTS_TOTAL,
            "method" => method.to_string(),
            "endpoint" => path.to_string(),
            "status" => status.to_string()
        )
        .increment(1);
        metrics::histogram!(
            REQUEST_DURATION_SECONDS,
            "method" => method.to_string(),
            "endpoint" => path.to_string()
        )
        .record(duration.as_secs_f64());
    }

    pub fn track_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
        metrics::counter!(CACHE_HITS_TOTAL).increment(1);
    }

    pub fn track_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
        metrics::counter!(CACHE_MISSES_TOTAL).increment(1);
    }

    /// Time elapsed since this aggregator was created.
    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    /// Point-in-time view of every counter. Has no side effects.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let hits = self.cache_hits.load(Ordering::Relaxed);
        let misses = self.cache_misses.load(Ordering::Relaxed);

        let endpoints = lock(&self.endpoints)
            .iter()
            .map(|(key, stat)| (key.clone(), stat.snapshot()))
            .collect();

        let by_status_code = lock(&self.errors).clone();
        let error_total = by_status_code.values().sum();

        MetricsSnapshot {
            uptime_seconds: self.uptime().as_secs(),
            requests: RequestsSnapshot {
                total: self.requests.load(Ordering::Relaxed),
            },
            endpoints,
            cache: CacheSnapshot {
                hits,
                misses,
                hit_rate: hit_rate(hits, misses),
            },
            errors: ErrorSnapshot {
                total: error_total,
                by_status_code,
            },
        }
    }
}

impl Default for RequestMetrics {
    fn default() -> Self {
        Self::new()
    }
}

// Counters stay usable even if a panicking thread poisoned a lock mid-update.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Hit percentage rounded to two decimal places; 0 when nothing was looked up.
fn hit_rate(hits: u64, misses: u64) -> f64 {
    let total = hits + misses;
    if total == 0 {
        return 0.0;
    }
    let rate = hits as f64 / total as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}

/// Serializable snapshot returned by `GET /metrics`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub uptime_seconds: u64,
    pub requests: RequestsSnapshot,
    pub endpoints: BTreeMap<String, EndpointSnapshot>,
    pub cache: CacheSnapshot,
    pub errors: ErrorSnapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RequestsSnapshot {
    pub total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointSnapshot {
    pub count: u64,
    pub avg_duration_ms: u64,
    pub min_duration_ms: u64,
    pub max_duration_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorSnapshot {
    pub total: u64,
    pub by_status_code: BTreeMap<u16, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_rate_rounds_to_two_decimals() {
        assert_eq!(hit_rate(1, 2), 33.33);
        assert_eq!(hit_rate(2, 1), 66.67);
    }

    #[test]
    fn hit_rate_is_zero_without_lookups() {
        assert_eq!(hit_rate(0, 0), 0.0);
    }

    #[test]
    fn average_rounds_half_up() {
        let mut stat = EndpointStat::first(1);
        stat.observe(2);
        assert_eq!(stat.snapshot().avg_duration_ms, 2);
    }
}
