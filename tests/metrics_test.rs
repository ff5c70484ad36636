//! Tests for [`RequestMetrics`] aggregation and `metrics` facade emission.
//!
//! Facade assertions use `metrics_util::debugging::DebuggingRecorder` to
//! capture emitted metrics without needing a real exporter.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use weathergate::telemetry::{self, RequestMetrics};
use weathergate::types::{Units, UpstreamWeather};
use weathergate::{GatewayError, Result, WeatherGateway, WeatherProvider};

// ============================================================================
// Aggregation
// ============================================================================

#[test]
fn endpoint_stats_accumulate() {
    let metrics = RequestMetrics::new();
    metrics.track_request("GET", "/x", 200, Duration::from_millis(100));
    metrics.track_request("GET", "/x", 200, Duration::from_millis(300));

    let snapshot = metrics.snapshot();
    let stat = snapshot.endpoints["GET /x"];
    assert_eq!(stat.count, 2);
    assert_eq!(stat.avg_duration_ms, 200);
    assert_eq!(stat.min_duration_ms, 100);
    assert_eq!(stat.max_duration_ms, 300);
    assert_eq!(snapshot.requests.total, 2);
    assert_eq!(snapshot.errors.total, 0);
}

#[test]
fn endpoints_are_keyed_by_method_and_path() {
    let metrics = RequestMetrics::new();
    metrics.track_request("GET", "/weather/:city", 200, Duration::from_millis(5));
    metrics.track_request("POST", "/get-token", 200, Duration::from_millis(5));
    metrics.track_request("GET", "/weather/:city", 200, Duration::from_millis(5));

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.endpoints.len(), 2);
    assert_eq!(snapshot.endpoints["GET /weather/:city"].count, 2);
    assert_eq!(snapshot.endpoints["POST /get-token"].count, 1);
}

#[test]
fn error_statuses_are_tallied() {
    let metrics = RequestMetrics::new();
    metrics.track_request("GET", "/x", 404, Duration::from_millis(10));

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.errors.total, 1);
    assert_eq!(snapshot.errors.by_status_code[&404], 1);

    metrics.track_request("GET", "/x", 404, Duration::from_millis(10));
    metrics.track_request("GET", "/x", 500, Duration::from_millis(10));
    metrics.track_request("GET", "/x", 399, Duration::from_millis(10));

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.errors.total, 3);
    assert_eq!(snapshot.errors.by_status_code[&404], 2);
    assert_eq!(snapshot.errors.by_status_code[&500], 1);
    assert!(!snapshot.errors.by_status_code.contains_key(&399));
}

#[test]
fn hit_rate_is_percentage() {
    let metrics = RequestMetrics::new();
    assert_eq!(metrics.snapshot().cache.hit_rate, 0.0);

    metrics.track_cache_hit();
    metrics.track_cache_miss();

    let cache = metrics.snapshot().cache;
    assert_eq!(cache.hits, 1);
    assert_eq!(cache.misses, 1);
    assert_eq!(cache.hit_rate, 50.0);
}

#[test]
fn snapshot_has_no_side_effects() {
    let metrics = RequestMetrics::new();
    metrics.track_request("GET", "/x", 200, Duration::from_millis(1));
    let first = metrics.snapshot();
    let second = metrics.snapshot();
    assert_eq!(first.requests, second.requests);
    assert_eq!(first.endpoints, second.endpoints);
}

#[test]
fn snapshot_serializes_camel_case() {
    let metrics = RequestMetrics::new();
    metrics.track_request("GET", "/x", 403, Duration::from_millis(12));
    metrics.track_cache_hit();

    let json = serde_json::to_value(metrics.snapshot()).unwrap();
    assert!(json["uptimeSeconds"].is_u64());
    assert_eq!(json["requests"]["total"], 1);
    assert_eq!(json["endpoints"]["GET /x"]["avgDurationMs"], 12);
    assert_eq!(json["cache"]["hitRate"], 100.0);
    assert_eq!(json["errors"]["byStatusCode"]["403"], 1);
}

#[test]
fn concurrent_updates_are_not_lost() {
    let metrics = Arc::new(RequestMetrics::new());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let metrics = Arc::clone(&metrics);
            std::thread::spawn(move || {
                for _ in 0..250 {
                    metrics.track_request("GET", "/x", 500, Duration::from_millis(1));
                    metrics.track_cache_miss();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.requests.total, 2000);
    assert_eq!(snapshot.endpoints["GET /x"].count, 2000);
    assert_eq!(snapshot.errors.by_status_code[&500], 2000);
    assert_eq!(snapshot.cache.misses, 2000);
}

// ============================================================================
// Facade emission
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

/// Sum all counter values matching a given metric name.
fn counter_total(snapshot: &SnapshotVec, name: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

fn has_histogram(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Histogram && key.key().name() == name)
}

#[test]
fn track_request_emits_facade_metrics() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        let metrics = RequestMetrics::new();
        metrics.track_request("GET", "/status", 200, Duration::from_millis(3));
        metrics.track_cache_hit();
        metrics.track_cache_miss();
        metrics.track_cache_miss();
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter_total(&snapshot, telemetry::REQUESTS_TOTAL), 1);
    assert!(has_histogram(&snapshot, telemetry::REQUEST_DURATION_SECONDS));
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_HITS_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_MISSES_TOTAL), 2);
}

struct FailingProvider;

#[async_trait]
impl WeatherProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn current_weather(&self, _city: &str, _units: Units) -> Result<UpstreamWeather> {
        Err(GatewayError::Http("connection refused".into()))
    }
}

/// Runs async code within a local recorder scope on the multi-thread runtime.
///
/// `block_in_place` ensures the sync `with_local_recorder` closure stays
/// on the current thread while `block_on` drives the inner async work.
#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn failed_upstream_records_error_metric() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let result = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let gateway = WeatherGateway::builder()
                    .provider(Arc::new(FailingProvider))
                    .build()
                    .unwrap();
                gateway.lookup("London").await
            })
        })
    });
    assert!(result.is_err());

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter_total(&snapshot, telemetry::UPSTREAM_REQUESTS_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_MISSES_TOTAL), 1);
}

#[test]
fn metrics_are_noop_without_recorder() {
    // Verify no panics when no recorder is installed.
    let metrics = RequestMetrics::new();
    metrics.track_request("GET", "/x", 200, Duration::from_millis(1));
    metrics.track_cache_hit();
}
