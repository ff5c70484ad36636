//! Builder for configuring gateway instances

use std::sync::Arc;
use std::time::Duration;

use super::WeatherGateway;
use crate::cache::{CacheConfig, WeatherCache};
use crate::telemetry::RequestMetrics;
use crate::types::Units;
use crate::upstream::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, OpenWeatherClient, WeatherProvider};
use crate::{GatewayError, Result};

/// Builder for configuring [`WeatherGateway`] instances.
///
/// ```rust,no_run
/// # use std::time::Duration;
/// # use weathergate::{Units, WeatherGateway};
/// let gateway = WeatherGateway::builder()
///     .openweather(std::env::var("OWM_API_KEY").ok())
///     .units(Units::Imperial)
///     .cache_ttl(Duration::from_secs(300))
///     .build()?;
/// # Ok::<(), weathergate::GatewayError>(())
/// ```
pub struct WeatherGatewayBuilder {
    provider: Option<Arc<dyn WeatherProvider>>,
    openweather: Option<OpenWeatherSettings>,
    units: Units,
    cache: Option<Arc<WeatherCache>>,
    cache_config: CacheConfig,
    metrics: Option<Arc<RequestMetrics>>,
}

struct OpenWeatherSettings {
    api_key: Option<String>,
    base_url: String,
    timeout: Duration,
}

impl WeatherGatewayBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            openweather: None,
            units: Units::default(),
            cache: None,
            cache_config: CacheConfig::default(),
            metrics: None,
        }
    }

    /// Use a custom upstream provider. Takes precedence over [`openweather`](Self::openweather).
    pub fn provider(mut self, provider: Arc<dyn WeatherProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Configure the OpenWeatherMap provider.
    ///
    /// The key may be absent; lookups then fail with
    /// [`GatewayError::MissingApiKey`] instead of the build failing.
    pub fn openweather(mut self, api_key: Option<String>) -> Self {
        self.openweather_settings().api_key = api_key;
        self
    }

    /// Override the OpenWeatherMap base URL.
    pub fn openweather_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.openweather_settings().base_url = base_url.into();
        self
    }

    /// Set the upstream request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.openweather_settings().timeout = timeout;
        self
    }

    fn openweather_settings(&mut self) -> &mut OpenWeatherSettings {
        self.openweather.get_or_insert_with(|| OpenWeatherSettings {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Unit system requested from the upstream provider.
    pub fn units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    /// Set the TTL of the cache created by [`build`](Self::build).
    ///
    /// Ignored when a shared cache is supplied via [`cache`](Self::cache).
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_config = self.cache_config.ttl(ttl);
        self
    }

    /// Share an existing cache instead of creating one.
    pub fn cache(mut self, cache: Arc<WeatherCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Share an existing metrics aggregator instead of creating one.
    pub fn metrics(mut self, metrics: Arc<RequestMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn build(self) -> Result<WeatherGateway> {
        let provider: Arc<dyn WeatherProvider> = match (self.provider, self.openweather) {
            (Some(provider), _) => provider,
            (None, Some(settings)) => Arc::new(OpenWeatherClient::with_base_url(
                settings.api_key,
                settings.base_url,
                settings.timeout,
            )?),
            (None, None) => return Err(GatewayError::NoProvider),
        };

        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(WeatherCache::new(&self.cache_config)));
        let metrics = self.metrics.unwrap_or_default();

        Ok(WeatherGateway::new(provider, cache, metrics, self.units))
    }
}

impl Default for WeatherGatewayBuilder {
    fn default() -> Self {
        Self::new()
    }
}
