use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::exceptions::ConfigError;

/// Install the global `tracing` subscriber
///
/// `RUST_LOG` wins over `log_level` when set. With a `log_file` events are
/// written as JSON lines to that file, otherwise as text to stdout. A
/// subscriber that is already installed is left in place.
pub fn setup_logging(
    log_level: &str,
    log_file: Option<PathBuf>,
    node_id: Option<&str>,
) -> Result<(), ConfigError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    // RFC 3339, e.g. 2024-01-12T15:30:45.123456789+03:00
    let timer = fmt::time::ChronoLocal::rfc_3339();

    let installed = if let Some(path) = log_file {
        let file = File::create(path)?;

        let layer = fmt::layer().with_timer(timer).json().with_writer(file);

        tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init()
    } else {
        let layer = fmt::layer().with_timer(timer).with_writer(std::io::stdout);

        tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init()
    };

    if installed.is_err() {
        tracing::debug!("Subscriber already installed, keeping it");
    }

    if let Some(id) = node_id {
        // first 16 hex digits are enough to tell nodes apart in logs
        let truncated_id = id.get(..16).unwrap_or(id);

        tracing::info!(node_id = %truncated_id, "Logging initialized");
    }

    Ok(())
}

/// Log a module start-up event
pub fn get_logger(name: &'static str) {
    tracing::info!(module = name, "Module logger initialized");
}
