//! Error types for the customer service

use shared_bus::PublishError;
use thiserror::Error;

/// Errors from directory backends
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    #[error("Directory unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while handling a bus message
#[derive(Debug, Error)]
pub enum CustomerServiceError {
    #[error("Undecodable request: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Reply publish failed: {0}")]
    Publish(#[from] PublishError),
}
