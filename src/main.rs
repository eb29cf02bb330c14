//! Fragment Gateway (v1)
//!
//! An aggregating reverse proxy built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────────┐
//!                    │                  FRAGMENT GATEWAY                     │
//!                    │                                                       │
//!   Client Request   │  ┌─────────┐    ┌──────────┐    ┌──────────────┐      │
//!   ─────────────────┼─▶│  http   │───▶│ routing  │───▶│ multiplexer  │──────┼──▶ Upstream
//!                    │  │ server  │    │ (router) │    │ (JoinSet per │      │    (layout +
//!                    │  └─────────┘    └──────────┘    │   fragment)  │◀─────┼──── fragments)
//!                    │       ▲                         └──────┬───────┘      │
//!                    │       │                                ▼              │
//!   Client Response  │       │                         ┌──────────────┐      │
//!   ◀────────────────┼───────┴─────────────────────────│   assembly   │      │
//!                    │                                 │ (placeholders│      │
//!                    │                                 │  + title)    │      │
//!                    │                                 └──────────────┘      │
//!                    │  ┌─────────────────────────────────────────────────┐  │
//!                    │  │ config │ observability │ security │ lifecycle   │  │
//!                    │  └─────────────────────────────────────────────────┘  │
//!                    └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use fragment_gateway::config::{load_config, GatewayConfig};
use fragment_gateway::observability::{logging, metrics};
use fragment_gateway::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "fragment-gateway")]
#[command(about = "Aggregating fragment gateway", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    logging::init_logging(&config.observability);

    tracing::info!("fragment-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.target,
        routes = config.routes.len(),
        fetch_timeout_ms = config.upstream.timeout_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
