//! Ports (hexagonal architecture).

use crate::domain::Customer;
use crate::error::DirectoryError;
use async_trait::async_trait;
use shared_types::CustomerId;

/// Customer lookup.
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    /// `Ok(None)` when the customer does not exist.
    async fn find(&self, id: CustomerId) -> Result<Option<Customer>, DirectoryError>;
}
