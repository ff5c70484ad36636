//! HTTP server.
//!
//! This module provides:
//! - Configuration types (`config`)
//! - Shared state built from configuration (`state`)
//! - The axum router (`routes`), handlers, and middleware
//! - HTTP error mapping (`error`)
//! - [`serve`], which binds and runs until shutdown

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::{Config, Secrets};
pub use error::{ApiError, ApiResult};
pub use routes::router;
pub use state::AppState;

use std::future::Future;
use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;

use crate::{GatewayError, Result};

/// Bind `addr` and serve `state` until `shutdown` resolves.
pub async fn serve<F>(addr: SocketAddr, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| GatewayError::Configuration(format!("Failed to bind {addr}: {e}")))?;
    info!(%addr, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| GatewayError::Http(format!("server error: {e}")))
}
