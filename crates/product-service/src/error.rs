//! Error types for the product service

use shared_bus::PublishError;
use thiserror::Error;

/// Errors from catalog backends
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while handling a bus message
#[derive(Debug, Error)]
pub enum ProductServiceError {
    #[error("Undecodable request: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Reply publish failed: {0}")]
    Publish(#[from] PublishError),
}
