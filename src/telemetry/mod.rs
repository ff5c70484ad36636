//! Request and cache telemetry.
//!
//! Two views of the same observations:
//!
//! - [`RequestMetrics`] aggregates in-process counters for the lifetime of
//!   the process and backs the `GET /metrics` snapshot.
//! - Every observation is also emitted through the `metrics` facade using
//!   the names below. Consumers install their own recorder (e.g. prometheus,
//!   statsd); without a recorder installed, facade calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `weathergate_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `method` — HTTP method (e.g. "GET")
//! - `endpoint` — matched route template (e.g. "/weather/:city")
//! - `status` — HTTP status code, or "ok" | "error" for upstream calls

mod aggregator;

pub use aggregator::{
    CacheSnapshot, EndpointSnapshot, ErrorSnapshot, MetricsSnapshot, RequestMetrics,
    RequestsSnapshot,
};

/// Total HTTP requests handled.
///
/// Labels: `method`, `endpoint`, `status`.
pub const REQUESTS_TOTAL: &str = "weathergate_requests_total";

/// HTTP request duration in seconds.
///
/// Labels: `method`, `endpoint`.
pub const REQUEST_DURATION_SECONDS: &str = "weathergate_request_duration_seconds";

/// Total weather cache hits.
pub const CACHE_HITS_TOTAL: &str = "weathergate_cache_hits_total";

/// Total weather cache misses.
pub const CACHE_MISSES_TOTAL: &str = "weathergate_cache_misses_total";

/// Total upstream weather fetches.
///
/// Labels: `status` ("ok" | "error").
pub const UPSTREAM_REQUESTS_TOTAL: &str = "weathergate_upstream_requests_total";
