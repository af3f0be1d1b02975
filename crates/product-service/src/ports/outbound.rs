//! Outbound ports for the product service.

use crate::domain::Product;
use crate::error::CatalogError;
use async_trait::async_trait;
use shared_types::ProductId;

/// Product lookup.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// `Ok(None)` when the product does not exist.
    async fn find(&self, id: ProductId) -> Result<Option<Product>, CatalogError>;
}
