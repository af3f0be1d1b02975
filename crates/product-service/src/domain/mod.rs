//! Catalog domain.

pub mod product;

pub use product::{Product, PRODUCT_NOT_FOUND};
