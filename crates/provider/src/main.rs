//! `kms-provider`: provider plugin binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise the telemetry pipeline (JSON logs, optional OTLP).
//! 3. Initialise AWS SDK clients.
//! 4. Register the built-in resource types.
//! 5. Build the Axum router and serve the lifecycle protocol to the host.

mod aws;
mod config;
mod resource;
mod server;
mod telemetry;

use std::time::Duration;

use anyhow::Result;
use tracing::info;

use aws::ProviderClients;
use config::Config;
use resource::ResourceRegistry;
use server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(cfg.otel_exporter_otlp_endpoint.as_deref(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        listen_port = cfg.listen_port,
        "kms-provider starting"
    );

    // -----------------------------------------------------------------------
    // 3. AWS clients
    // -----------------------------------------------------------------------
    let clients =
        ProviderClients::init(cfg.aws_region.as_deref(), cfg.kms_endpoint_url.as_deref()).await?;

    // -----------------------------------------------------------------------
    // 4. Resource registry
    // -----------------------------------------------------------------------
    let registry = ResourceRegistry::with_builtin();
    info!(resource_types = registry.len(), "resources registered");

    // -----------------------------------------------------------------------
    // 5. HTTP server
    // -----------------------------------------------------------------------
    let state = AppState::new(registry, clients);
    let router = server::router::build(state, Duration::from_secs(cfg.request_timeout_secs));

    let addr: std::net::SocketAddr = ([127, 0, 0, 1], cfg.listen_port).into();
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
