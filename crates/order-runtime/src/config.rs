//! Runtime configuration.
//!
//! Defaults come from [`OrderServiceConfig`]; environment variables override
//! them. An unparsable value is logged and the default kept.

use order_service::OrderServiceConfig;
use shared_bus::DEFAULT_CHANNEL_CAPACITY;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

pub const VALIDATION_TIMEOUT_ENV: &str = "ORDER_FLOW_VALIDATION_TIMEOUT_MS";
pub const BUS_CAPACITY_ENV: &str = "ORDER_FLOW_BUS_CAPACITY";
pub const SEED_CATALOG_ENV: &str = "ORDER_FLOW_SEED_CATALOG";

/// Everything the runtime needs to wire the services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Order service settings
    pub service: OrderServiceConfig,
    /// Per-subscriber bus buffer
    pub bus_capacity: usize,
    /// Load the demo products and customers at startup
    pub seed_catalog: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            service: OrderServiceConfig::default(),
            bus_capacity: DEFAULT_CHANNEL_CAPACITY,
            seed_catalog: true,
        }
    }
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(ms) = parse::<u64, _>(&lookup, VALIDATION_TIMEOUT_ENV) {
            if ms == 0 {
                warn!(var = VALIDATION_TIMEOUT_ENV, "Timeout must be positive, keeping default");
            } else {
                config.service.validation_timeout = Duration::from_millis(ms);
            }
        }

        if let Some(capacity) = parse::<usize, _>(&lookup, BUS_CAPACITY_ENV) {
            if capacity == 0 {
                warn!(var = BUS_CAPACITY_ENV, "Capacity must be positive, keeping default");
            } else {
                config.bus_capacity = capacity;
            }
        }

        if let Some(seed) = parse::<bool, _>(&lookup, SEED_CATALOG_ENV) {
            config.seed_catalog = seed;
        }

        config
    }
}

fn parse<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(var = key, value = %raw, "Invalid value, keeping default");
            None
        }
    }
}
