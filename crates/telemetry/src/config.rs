//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Filter directive (trace, debug, info, warn, error, or per-target)
    pub log_level: String,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,

    /// Whether to include the emitting target (module path)
    pub with_target: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "order-flow".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            with_target: true,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OTEL_SERVICE_NAME`: Service name (default: order-flow)
    /// - `ORDER_FLOW_LOG_LEVEL` or `RUST_LOG`: Filter directive (default: info)
    /// - `ORDER_FLOW_JSON_LOGS`: Enable JSON logs (default: false)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            service_name: lookup("OTEL_SERVICE_NAME").unwrap_or(defaults.service_name),

            log_level: lookup("ORDER_FLOW_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),

            json_logs: lookup("ORDER_FLOW_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(defaults.json_logs),

            with_target: defaults.with_target,
        }
    }

    /// Create configuration for a specific service.
    pub fn for_service(service_name: &str) -> Self {
        let mut config = Self::from_env();
        config.service_name = service_name.to_string();
        config
    }
}
