//! Lead Gateway
//!
//! An HTTP gateway for customer lead-submission forms, built with
//! Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────┐
//!                       │                LEAD GATEWAY                   │
//!                       │                                               │
//!   Client Request      │  ┌──────────┐   ┌───────────┐   ┌──────────┐ │
//!   ────────────────────┼─▶│   http   │──▶│ security  │──▶│submission│ │
//!                       │  │  server  │   │rate limit │   │ validate │ │
//!                       │  └──────────┘   └───────────┘   └────┬─────┘ │
//!                       │                                      │       │
//!                       │                                      ▼       │
//!                       │                  ┌──────────┐   ┌──────────┐ │
//!   Client Response     │                  │  notify  │◀──│ sanitize │ │
//!   ◀───────────────────┼──────────────────│ telegram │   │ + format │ │
//!                       │                  └────┬─────┘   └──────────┘ │
//!                       │                       │                      │
//!                       │  ┌───────────────────┼────────────────────┐  │
//!                       │  │        Cross-Cutting Concerns          │  │
//!                       │  │  ┌────────┐ ┌──────────────┐ ┌───────┐ │  │
//!                       │  │  │ config │ │observability │ │lifecyc│ │  │
//!                       │  │  └────────┘ └──────────────┘ └───────┘ │  │
//!                       │  └────────────────────────────────────────┘  │
//!                       └───────────────────┬───────────────────────────┘
//!                                           ▼
//!                                  Telegram Bot API
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use lead_gateway::config::{load_config, GatewayConfig};
use lead_gateway::lifecycle::Shutdown;
use lead_gateway::observability;
use lead_gateway::GatewayServer;

#[derive(Parser)]
#[command(name = "lead-gateway", about = "Lead submission gateway")]
struct Args {
    /// Path to a TOML config file; defaults apply without one.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured bind address.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration before the subscriber so the configured level
    // can seed the default filter.
    let mut config: GatewayConfig = load_config(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    observability::logging::init(&config.observability.log_level);

    tracing::info!("lead-gateway v0.1.0 starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        notify_timeout_secs = config.timeouts.notify_secs,
        rate_limit_enabled = config.rate_limit.enabled,
        "Configuration loaded"
    );

    if config.messaging.credentials().is_none() {
        tracing::warn!(
            "TELEGRAM_BOT_TOKEN / TELEGRAM_CHAT_ID not set; submissions will be rejected"
        );
    }

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = GatewayServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
