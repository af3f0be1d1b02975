//! Order service error types.

use shared_bus::PublishError;
use shared_types::CorrelationId;
use thiserror::Error;

/// Correlation registry errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A waiter with this ID is still pending. IDs are random, so this is a bug.
    #[error("correlation ID {0} is already pending")]
    DuplicateCorrelationId(CorrelationId),
}

/// Infrastructure failures surfaced to callers of the order service.
///
/// Business rejections are not errors; they come back as
/// [`OrderDecision::Rejected`](crate::domain::order::OrderDecision).
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("internal error: {0}")]
    Registry(#[from] RegistryError),

    #[error("bus publish failed: {0}")]
    Publish(#[from] PublishError),

    #[error("malformed reply {correlation_id}: {reason}")]
    MalformedReply {
        correlation_id: CorrelationId,
        reason: String,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
    #[error("invalid consumer group: {0}")]
    InvalidGroup(String),
}

impl OrderError {
    /// True for failures of the bus itself (closed, unencodable payload).
    pub fn is_transport(&self) -> bool {
        matches!(self, OrderError::Publish(_))
    }
}
