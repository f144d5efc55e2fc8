//! Structured logging.
//!
//! # Design Decisions
//! - tracing with an EnvFilter: `RUST_LOG` overrides the configured
//!   level, matching how the proxy is operated in development
//! - Plain fmt layer; log aggregation happens outside the process

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global subscriber.
///
/// `default_level` comes from configuration and is used when `RUST_LOG`
/// is unset.
pub fn init_logging(default_level: &str) {
    let default_directive = format!("image_proxy={default_level},tower_http=warn");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
