use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared_types::{CorrelationId, ProductId, ProductValidationResponse};

/// Rejection reason for unknown products.
pub const PRODUCT_NOT_FOUND: &str = "Product not found";

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit price
    pub price: Decimal,
    /// Units in stock
    pub stock: u32,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>, price: Decimal, stock: u32) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            stock,
        }
    }

    /// Acceptance reply carrying this product's name and price.
    pub fn validation_reply(&self, correlation_id: CorrelationId) -> ProductValidationResponse {
        ProductValidationResponse::valid(correlation_id, self.id, self.name.clone(), self.price)
    }
}
