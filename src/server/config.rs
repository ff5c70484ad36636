//! Configuration loading for weathergated.
//!
//! Configuration is resolved once at startup, lowest precedence first:
//! 1. Built-in defaults
//! 2. A TOML file: `--config <path>` (must exist), else
//!    `~/.weathergate/config.toml`, else `/etc/weathergate/config.toml`
//!    (both optional)
//! 3. Environment variables (`PORT`, `LOG_LEVEL`, `WEATHER_UNITS`, ...)
//!
//! Secrets are never read from the config file; they come from the
//! environment only (see [`Secrets`]). The signing secret and upstream API
//! key are optional here and reported as configuration faults on first use.

use std::fmt;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use tracing::level_filters::LevelFilter;

use crate::auth::Credentials;
use crate::cache::MAX_CACHE_TTL;
use crate::types::Units;
use crate::upstream::DEFAULT_BASE_URL;
use crate::{GatewayError, Result};

/// Longest accepted token lifetime (one year).
const MAX_TOKEN_TTL_SECS: u64 = 365 * 24 * 3600;

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Server network and logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0).
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on (default: 3000).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Log verbosity (default: WARN).
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: LogLevel::default(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Upstream and cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherConfig {
    /// Unit system requested upstream (default: metric).
    #[serde(default)]
    pub units: Units,
    /// Cache time-to-live in seconds (default: 600).
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
    /// Upstream base URL (default: the public OpenWeatherMap API).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Upstream request timeout in seconds (default: 10).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            units: Units::default(),
            cache_ttl_secs: default_cache_ttl(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl WeatherConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_cache_ttl() -> u64 {
    600
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    10
}

/// Token issuance configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Lifetime of issued tokens in seconds (default: 3600).
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_ttl_secs: default_token_ttl(),
        }
    }
}

impl AuthConfig {
    pub fn token_lifetime(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }
}

fn default_token_ttl() -> u64 {
    3600
}

/// Log verbosity, ordered from quietest to loudest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_directive().to_ascii_uppercase())
    }
}

impl FromStr for LogLevel {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ERROR" => Ok(LogLevel::Error),
            "WARN" => Ok(LogLevel::Warn),
            "INFO" => Ok(LogLevel::Info),
            "DEBUG" => Ok(LogLevel::Debug),
            other => Err(GatewayError::Configuration(format!(
                "unknown log level '{other}' (expected ERROR, WARN, INFO or DEBUG)"
            ))),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = GatewayError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Secrets and the accepted credential pair, read from the environment.
///
/// Every field is optional: a missing signing secret or API key is a
/// configuration fault reported at request time, and a missing credential
/// pair disables token issuance.
#[derive(Clone, Default)]
pub struct Secrets {
    pub jwt_secret: Option<String>,
    pub owm_api_key: Option<String>,
    pub credentials: Option<Credentials>,
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("owm_api_key", &self.owm_api_key.as_ref().map(|_| "<redacted>"))
            .field("credentials", &self.credentials)
            .finish()
    }
}

/// Environment variable names.
pub mod env {
    pub const HOST: &str = "HOST";
    pub const PORT: &str = "PORT";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    pub const WEATHER_UNITS: &str = "WEATHER_UNITS";
    pub const CACHE_TTL_SECONDS: &str = "CACHE_TTL_SECONDS";
    pub const OWM_BASE_URL: &str = "OWM_BASE_URL";
    pub const JWT_SECRET: &str = "JWT_SECRET";
    pub const OWM_API_KEY: &str = "OWM_API_KEY";
    pub const AUTH_USERNAME: &str = "AUTH_USERNAME";
    pub const AUTH_PASSWORD: &str = "AUTH_PASSWORD";
}

/// Read a variable, treating an empty value as unset.
fn lookup_non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup_non_empty(lookup, key)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| {
                GatewayError::Configuration(format!("invalid value for {key} ({raw:?}): {e}"))
            })
        })
        .transpose()
}

impl Config {
    /// Load configuration from the standard locations and the process
    /// environment, then validate it.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::from_file(&path)?,
            None => Config::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GatewayError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            GatewayError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path. `Ok(None)` means no file; defaults apply.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(GatewayError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".weathergate").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/weathergate/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// Override fields from environment-style variables.
    ///
    /// Empty values are treated as unset. Unparseable values are errors.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup_non_empty(&lookup, env::HOST) {
            self.server.host = host;
        }
        if let Some(port) = parse_var(&lookup, env::PORT)? {
            self.server.port = port;
        }
        if let Some(level) = parse_var(&lookup, env::LOG_LEVEL)? {
            self.server.log_level = level;
        }
        if let Some(units) = parse_var(&lookup, env::WEATHER_UNITS)? {
            self.weather.units = units;
        }
        if let Some(ttl) = parse_var(&lookup, env::CACHE_TTL_SECONDS)? {
            self.weather.cache_ttl_secs = ttl;
        }
        if let Some(base_url) = lookup_non_empty(&lookup, env::OWM_BASE_URL) {
            self.weather.base_url = base_url;
        }
        Ok(())
    }

    /// Reject values that parse but cannot work.
    pub fn validate(&self) -> Result<()> {
        if self.weather.cache_ttl_secs == 0 {
            return Err(GatewayError::Configuration(
                "cache TTL must be at least one second".to_string(),
            ));
        }
        if self.weather.cache_ttl_secs > MAX_CACHE_TTL.as_secs() {
            return Err(GatewayError::Configuration(format!(
                "cache TTL must not exceed {} seconds",
                MAX_CACHE_TTL.as_secs()
            )));
        }
        if self.weather.timeout_secs == 0 {
            return Err(GatewayError::Configuration(
                "upstream timeout must be at least one second".to_string(),
            ));
        }
        if self.auth.token_ttl_secs == 0 {
            return Err(GatewayError::Configuration(
                "token lifetime must be at least one second".to_string(),
            ));
        }
        if self.auth.token_ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(GatewayError::Configuration(format!(
                "token lifetime must not exceed {MAX_TOKEN_TTL_SECS} seconds"
            )));
        }
        self.socket_addr().map(|_| ())
    }

    /// Socket address to bind.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self.server.host.parse().map_err(|e| {
            GatewayError::Configuration(format!("Invalid host {:?}: {e}", self.server.host))
        })?;
        Ok(SocketAddr::new(ip, self.server.port))
    }
}

impl Secrets {
    /// Read secrets from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read secrets through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            jwt_secret: lookup_non_empty(&lookup, env::JWT_SECRET),
            owm_api_key: lookup_non_empty(&lookup, env::OWM_API_KEY),
            credentials: Credentials::from_parts(
                lookup_non_empty(&lookup, env::AUTH_USERNAME),
                lookup_non_empty(&lookup, env::AUTH_PASSWORD),
            ),
        }
    }
}
