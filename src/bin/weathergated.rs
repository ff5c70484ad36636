//! weathergated — Weathergate daemon.
//!
//! Serves authenticated, cached weather lookups over HTTP.

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use weathergate::server::{self, AppState, Config, Secrets};

/// Weathergate daemon: authenticated caching weather gateway.
#[derive(Parser)]
#[command(name = "weathergated")]
#[command(version = weathergate::PKG_VERSION)]
#[command(about = "Weathergate HTTP gateway daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, env = "WEATHERGATE_CONFIG")]
    config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration; invalid values stop startup here
    let config = Config::load(args.config.as_deref())?;
    let secrets = Secrets::from_env();

    // RUST_LOG wins; otherwise the configured level applies
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::from(config.server.log_level).into())
                .from_env_lossy(),
        )
        .init();

    warn_on_missing_secrets(&secrets);

    let addr = config.socket_addr()?;
    let state = AppState::from_config(&config, secrets)?;

    info!(
        version = weathergate::version_string(),
        %addr,
        units = %config.weather.units,
        cache_ttl_secs = config.weather.cache_ttl_secs,
        "weathergated starting"
    );

    server::serve(addr, state, shutdown_signal()).await?;

    info!("weathergated stopped");
    Ok(())
}

/// Missing secrets are reported per request; flag them once at startup too.
fn warn_on_missing_secrets(secrets: &Secrets) {
    if secrets.jwt_secret.is_none() {
        tracing::warn!("JWT_SECRET is not set; token issuance and verification will fail");
    }
    if secrets.owm_api_key.is_none() {
        tracing::warn!("OWM_API_KEY is not set; weather lookups will fail");
    }
    if secrets.credentials.is_none() {
        tracing::warn!("AUTH_USERNAME/AUTH_PASSWORD not set; token issuance is disabled");
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
