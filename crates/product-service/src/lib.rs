//! # Product Service
//!
//! Owns the product catalog and answers `validate-product-request` messages
//! with a `product-validation-response` keyed by the request's correlation ID.
//! Also listens to `order-created` announcements.
//!
//! ```text
//! validate-product-request ──→ ProductValidationConsumer ──→ product-validation-response
//!                                        │
//!                                  ProductCatalog::find
//!
//! order-created ─────────────→ OrderEventConsumer (log)
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;

pub use adapters::{InMemoryProductCatalog, OrderEventConsumer, ProductValidationConsumer};
pub use domain::{Product, PRODUCT_NOT_FOUND};
pub use error::{CatalogError, ProductServiceError};
pub use ports::ProductCatalog;
