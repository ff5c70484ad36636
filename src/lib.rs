//! Weathergate - authenticated caching gateway for weather lookups
//!
//! This crate shields a third-party weather API behind bearer-token
//! authentication and a time-bounded cache, while aggregating request and
//! cache metrics for the whole process lifetime.
//!
//! The core pieces are usable without the HTTP surface:
//!
//! - [`WeatherGateway`] — cache-first lookups over a [`WeatherProvider`]
//! - [`TokenAuthority`] — HS256 token issuance and the request gate
//! - [`RequestMetrics`] — request, cache, and error counters
//!
//! # Lookup Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use weathergate::WeatherGateway;
//!
//! #[tokio::main]
//! async fn main() -> weathergate::Result<()> {
//!     let gateway = WeatherGateway::builder()
//!         .openweather(std::env::var("OWM_API_KEY").ok())
//!         .cache_ttl(Duration::from_secs(600))
//!         .build()?;
//!
//!     let first = gateway.lookup("London").await?;
//!     let second = gateway.lookup("London").await?;
//!     assert!(!first.from_cache && second.from_cache);
//!
//!     println!("{:?}", gateway.metrics().snapshot().cache);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod cache;
pub mod error;
pub mod gateway;
#[cfg(feature = "server")]
pub mod server;
pub mod telemetry;
pub mod types;
pub mod upstream;
mod version;

// Re-export main types at crate root
pub use auth::{AuthError, Credentials, Identity, TokenAuthority};
pub use cache::{CacheConfig, TtlCache, WeatherCache};
pub use error::{GatewayError, Result};
pub use gateway::{Lookup, WeatherGateway, WeatherGatewayBuilder};
pub use telemetry::{MetricsSnapshot, RequestMetrics};
pub use types::{Units, UpstreamWeather, WeatherReport};
pub use upstream::{OpenWeatherClient, WeatherProvider};
pub use version::{GIT_SHA, PKG_VERSION, git_commit, version_string};
