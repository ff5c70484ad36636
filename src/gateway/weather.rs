//! WeatherGateway - cache-first weather lookups

use std::sync::Arc;

use tracing::{debug, error};

use super::WeatherGatewayBuilder;
use crate::Result;
use crate::cache::WeatherCache;
use crate::telemetry::{self, RequestMetrics};
use crate::types::{Units, WeatherReport};
use crate::upstream::WeatherProvider;

/// Result of a weather lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup {
    pub report: WeatherReport,
    /// `true` when served from the cache without an upstream call.
    pub from_cache: bool,
}

/// Composes the weather cache, the upstream provider, and request metrics.
///
/// Lookups are cache-first. On a miss the upstream is called once; a
/// successful response is normalized and cached under the city exactly as
/// the caller spelled it. Failures are propagated unchanged and never cached.
///
/// Concurrent misses for the same city are not coalesced; each performs its
/// own upstream fetch and the last writer wins.
pub struct WeatherGateway {
    provider: Arc<dyn WeatherProvider>,
    cache: Arc<WeatherCache>,
    metrics: Arc<RequestMetrics>,
    units: Units,
}

impl WeatherGateway {
    /// Create a new builder for configuring the gateway.
    pub fn builder() -> WeatherGatewayBuilder {
        WeatherGatewayBuilder::new()
    }

    pub(crate) fn new(
        provider: Arc<dyn WeatherProvider>,
        cache: Arc<WeatherCache>,
        metrics: Arc<RequestMetrics>,
        units: Units,
    ) -> Self {
        Self {
            provider,
            cache,
            metrics,
            units,
        }
    }

    /// Look up current weather for `city`, consulting the cache first.
    pub async fn lookup(&self, city: &str) -> Result<Lookup> {
        if let Some(report) = self.cache.get(city) {
            self.metrics.track_cache_hit();
            debug!(%city, "weather cache hit");
            return Ok(Lookup {
                report,
                from_cache: true,
            });
        }

        self.metrics.track_cache_miss();
        debug!(%city, provider = self.provider.name(), "weather cache miss");

        let fetched = self
            .provider
            .current_weather(city, self.units)
            .await
            .and_then(WeatherReport::try_from);

        let report = match fetched {
            Ok(report) => {
                metrics::counter!(telemetry::UPSTREAM_REQUESTS_TOTAL, "status" => "ok")
                    .increment(1);
                report
            }
            Err(err) => {
                metrics::counter!(telemetry::UPSTREAM_REQUESTS_TOTAL, "status" => "error")
                    .increment(1);
                error!(%city, provider = self.provider.name(), error = %err, "weather fetch failed");
                return Err(err);
            }
        };

        self.cache.insert(city, report.clone());
        Ok(Lookup {
            report,
            from_cache: false,
        })
    }

    /// Unit system passed to the upstream provider.
    pub fn units(&self) -> Units {
        self.units
    }

    pub fn cache(&self) -> &Arc<WeatherCache> {
        &self.cache
    }

    pub fn metrics(&self) -> &Arc<RequestMetrics> {
        &self.metrics
    }
}
