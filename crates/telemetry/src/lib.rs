//! # Telemetry
//!
//! Structured logging for the order-flow services.
//!
//! Every crate logs through `tracing` macros with structured fields
//! (`correlation_id`, `topic`, `order_id`, ...). This crate owns the one-time
//! installation of the global subscriber that renders them.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use telemetry::{init_logging, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_logging(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `order-flow` | Service name attached to every line |
//! | `ORDER_FLOW_LOG_LEVEL` | `info` | Filter directive (falls back to `RUST_LOG`) |
//! | `ORDER_FLOW_JSON_LOGS` | `false` | Emit JSON lines instead of text |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{build_filter, init_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter '{directive}': {reason}")]
    InvalidFilter { directive: String, reason: String },

    #[error("Global subscriber already installed: {0}")]
    AlreadyInitialized(String),
}
