//! Order service configuration with validation.

use crate::domain::error::ConfigError;
use serde::{Deserialize, Serialize};
use shared_types::ORDER_SERVICE_GROUP;
use std::time::Duration;

/// Default time to wait for each validation reply
pub const DEFAULT_VALIDATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Order service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderServiceConfig {
    /// Per-request deadline for product and customer validation replies
    #[serde(with = "humantime_serde")]
    pub validation_timeout: Duration,
    /// Consumer group the reply dispatcher joins
    pub consumer_group: String,
}

impl Default for OrderServiceConfig {
    fn default() -> Self {
        Self {
            validation_timeout: DEFAULT_VALIDATION_TIMEOUT,
            consumer_group: ORDER_SERVICE_GROUP.to_string(),
        }
    }
}

impl OrderServiceConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.validation_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "validation_timeout cannot be 0".into(),
            ));
        }

        if self.consumer_group.trim().is_empty() {
            return Err(ConfigError::InvalidGroup(
                "consumer_group cannot be empty".into(),
            ));
        }

        Ok(())
    }

    pub fn with_validation_timeout(mut self, timeout: Duration) -> Self {
        self.validation_timeout = timeout;
        self
    }
}
