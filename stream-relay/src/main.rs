//! Stream Relay Main Entry Point
//!
//! Runs in one of two modes:
//!
//! - default: long-polls the configured queues and relays change events
//!   into the document index
//! - `purge`: one-shot bulk deletion of documents older than the retention
//!   window, intended to be invoked from a scheduler

use dotenv::dotenv;
use std::env;
use stream_relay::{Dependencies, RelayConfig, RelayError};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("stream_relay=info,stream_relay_repository=info"));

    if env::var("LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .init();
    }

    info!(
        service_name = "stream-relay",
        service_version = env!("CARGO_PKG_VERSION"),
        "Tracing initialized"
    );
}

#[tokio::main]
async fn main() -> Result<(), RelayError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    let config = match RelayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e);
        }
    };

    let deps = Dependencies::new(config)?;
    info!("Dependencies initialized successfully");

    match env::args().nth(1).as_deref() {
        Some("purge") => {
            info!("Running one-shot purge");
            deps.processor.purge().await;
            Ok(())
        }
        Some(mode) => Err(RelayError::config(format!("Unknown mode: {}", mode))),
        None => {
            info!("Starting relay worker");
            deps.poller.run().await
        }
    }
}
