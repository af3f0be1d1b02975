use crate::domain::Product;
use crate::error::CatalogError;
use crate::ports::ProductCatalog;
use async_trait::async_trait;
use shared_types::ProductId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory product catalog.
#[derive(Default, Clone)]
pub struct InMemoryProductCatalog {
    products: Arc<RwLock<HashMap<ProductId, Product>>>,
}

impl InMemoryProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog pre-filled with `products`.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let map = products.into_iter().map(|p| (p.id, p)).collect();
        Self {
            products: Arc::new(RwLock::new(map)),
        }
    }

    /// Add or replace a product.
    pub async fn insert(&self, product: Product) {
        self.products.write().await.insert(product.id, product);
    }

    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ProductCatalog for InMemoryProductCatalog {
    async fn find(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        Ok(self.products.read().await.get(&id).cloned())
    }
}
