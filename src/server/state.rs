//! Shared application state.

use std::sync::Arc;

use super::config::{Config, Secrets};
use crate::Result;
use crate::auth::{Credentials, TokenAuthority};
use crate::gateway::WeatherGateway;
use crate::telemetry::RequestMetrics;

/// State shared across all handlers and middleware.
///
/// Built once by the composition root and cloned cheaply per request.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<WeatherGateway>,
    pub tokens: Arc<TokenAuthority>,
    /// The single accepted login, if configured.
    pub credentials: Option<Arc<Credentials>>,
}

impl AppState {
    pub fn new(
        gateway: WeatherGateway,
        tokens: TokenAuthority,
        credentials: Option<Credentials>,
    ) -> Self {
        Self {
            gateway: Arc::new(gateway),
            tokens: Arc::new(tokens),
            credentials: credentials.map(Arc::new),
        }
    }

    /// Wire the production gateway, token authority, and credentials.
    pub fn from_config(config: &Config, secrets: Secrets) -> Result<Self> {
        let gateway = WeatherGateway::builder()
            .openweather(secrets.owm_api_key)
            .openweather_base_url(config.weather.base_url.clone())
            .timeout(config.weather.timeout())
            .units(config.weather.units)
            .cache_ttl(config.weather.cache_ttl())
            .build()?;
        let tokens = TokenAuthority::new(secrets.jwt_secret).lifetime(config.auth.token_lifetime());

        Ok(Self::new(gateway, tokens, secrets.credentials))
    }

    pub fn metrics(&self) -> &Arc<RequestMetrics> {
        self.gateway.metrics()
    }
}
