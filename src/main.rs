//! On-demand image transformation proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                 IMAGE PROXY                   │
//!                        │                                               │
//!   Client Request       │  ┌─────────┐    ┌────────────────────────┐   │
//!   ─────────────────────┼─▶│  http   │───▶│      dispatcher        │   │
//!                        │  │ server  │    │ coalesce → cache → run │   │
//!                        │  └─────────┘    └───┬────────────────┬───┘   │
//!                        │                     │                │       │
//!                        │                     ▼                ▼       │
//!                        │              ┌───────────┐    ┌───────────┐  │
//!                        │              │ load pool │───▶│ transform │  │
//!                        │              │ (loader)  │    │   pool    │  │
//!                        │              └───────────┘    └─────┬─────┘  │
//!                        │                                     │        │
//!                        │                          ┌──────────┴─────┐  │
//!                        │                          ▼                ▼  │
//!   Client Response      │  ┌─────────┐      ┌───────────┐   ┌────────┐│
//!   ◀────────────────────┼──│ deliver │◀─────│  deliver  │   │persist ││
//!                        │  │  sinks  │      │   pool    │   │  pool  ││
//!                        │  └─────────┘      └───────────┘   └────────┘│
//!                        │                                               │
//!                        │  Cross-cutting: config, observability         │
//!                        └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use image_proxy::config::{build_profiles, load_config};
use image_proxy::dispatch::Dispatcher;
use image_proxy::http::HttpServer;
use image_proxy::observability::{logging, metrics};

/// On-demand image transformation proxy.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the configuration file (TOML or JSON).
    #[arg(short, long)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_config(&args.config)?;

    logging::init_logging(&config.observability.log_level);

    tracing::info!(
        config = %args.config.display(),
        bind_address = %config.listener.bind_address,
        workers = config.dispatcher.workers,
        queue_depth = config.dispatcher.queue_depth,
        cache_capacity = config.dispatcher.cache_capacity,
        profiles = config.profiles.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Validation guarantees the address parses.
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let profiles = build_profiles(&config)?;
    let dispatcher = Arc::new(Dispatcher::start(profiles, &config.dispatcher));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(&config, dispatcher);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
