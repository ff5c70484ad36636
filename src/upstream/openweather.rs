//! OpenWeatherMap current-weather client.
//!
//! See: <https://openweathermap.org/current>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::WeatherProvider;
use crate::types::{Units, UpstreamWeather};
use crate::{GatewayError, Result};

/// Default base URL for the OpenWeatherMap API.
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// Default request timeout for upstream calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the OpenWeatherMap `data/2.5/weather` endpoint.
///
/// The API key is optional at construction; a missing key is reported as
/// [`GatewayError::MissingApiKey`] on the first lookup, without touching the
/// network.
#[derive(Clone)]
pub struct OpenWeatherClient {
    api_key: Option<String>,
    http: Client,
    base_url: String,
}

impl OpenWeatherClient {
    /// Create a client against the public API.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(
        api_key: Option<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        let base_url: String = base_url.into();

        Ok(Self {
            api_key: api_key.filter(|k| !k.is_empty()),
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn error_from_response(response: reqwest::Response) -> GatewayError {
        let status = response.status();
        // Error bodies look like {"cod": "404", "message": "city not found"}
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => format!("OpenWeatherMap API error: {status}"),
        };
        GatewayError::Upstream {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    fn name(&self) -> &str {
        "openweathermap"
    }

    async fn current_weather(&self, city: &str, units: Units) -> Result<UpstreamWeather> {
        let api_key = self.api_key.as_deref().ok_or(GatewayError::MissingApiKey)?;
        let url = format!("{}/data/2.5/weather", self.base_url);

        debug!(%city, %units, "fetching current weather");
        let response = self
            .http
            .get(&url)
            .query(&[("q", city), ("appid", api_key), ("units", units.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let err = Self::error_from_response(response).await;
            warn!(%city, error = %err, "upstream rejected weather lookup");
            return Err(err);
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}
