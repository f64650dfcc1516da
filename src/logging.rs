//! Tracing subscriber setup.
//!
//! Dispatch payloads are logged on the [`PAYLOAD_TARGET`] target. When a
//! payload log path is configured, those events are additionally appended
//! to that file; otherwise they follow the normal filter.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::config::LoggingConfig;
use crate::error::LoggingError;

/// Tracing target for raw dispatch payload events.
pub const PAYLOAD_TARGET: &str = "swaig_payload";

/// Default filter directive when `RUST_LOG` is unset.
fn default_directive(config: &LoggingConfig) -> &'static str {
    if config.debug {
        "debug,tower_http=debug"
    } else {
        "info,tower_http=info"
    }
}

/// Install the global subscriber.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config)));

    let console = if config.json {
        fmt::layer().json().with_target(true).boxed()
    } else {
        fmt::layer().with_target(true).boxed()
    };

    let payload = match &config.payload_log {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LoggingError::PayloadLog {
                    path: path.display().to_string(),
                    source,
                })?;
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file))
                .with_filter(Targets::new().with_target(PAYLOAD_TARGET, Level::DEBUG));
            Some(layer)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console.with_filter(filter))
        .with(payload)
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))?;

    tracing::debug!(
        json = config.json,
        payload_log = ?config.payload_log,
        "Logging initialized"
    );
    Ok(())
}
