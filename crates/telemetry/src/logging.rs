//! Global subscriber installation.
//!
//! Text output is meant for a terminal; JSON output carries the same fields
//! for a log shipper.

use crate::{TelemetryConfig, TelemetryError};
use tracing_subscriber::EnvFilter;

/// Parse the configured filter directive.
pub fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(&config.log_level).map_err(|e| TelemetryError::InvalidFilter {
        directive: config.log_level.clone(),
        reason: e.to_string(),
    })
}

/// Install the global `tracing` subscriber.
///
/// Fails if the filter is invalid or a subscriber is already installed.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = build_filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target)
        .with_thread_ids(true);

    let installed = if config.json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))?;

    tracing::info!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Logging initialized"
    );
    Ok(())
}
