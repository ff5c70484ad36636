//! Upstream weather providers.
//!
//! The gateway talks to its upstream through the [`WeatherProvider`] trait so
//! the orchestrator can be exercised against in-process fakes. The production
//! implementation is [`OpenWeatherClient`].
//!
//! # Failure semantics
//!
//! Providers return the raw [`UpstreamWeather`] payload; normalization is the
//! orchestrator's job. Every error is terminal for the request: providers do
//! not retry, and the gateway does not either.

mod openweather;

pub use openweather::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, OpenWeatherClient};

use async_trait::async_trait;

use crate::Result;
use crate::types::{Units, UpstreamWeather};

/// Source of current-weather data for a city.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Fetch current conditions for `city` in the given unit system.
    async fn current_weather(&self, city: &str, units: Units) -> Result<UpstreamWeather>;
}
