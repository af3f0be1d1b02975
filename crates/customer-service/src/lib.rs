//! # Customer Service
//!
//! Owns the customer directory and answers `validate-customer-request`
//! messages with a `customer-validation-response` keyed by the request's
//! correlation ID.

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;

pub use adapters::{CustomerValidationConsumer, InMemoryCustomerDirectory};
pub use domain::{Customer, CUSTOMER_NOT_FOUND};
pub use error::{CustomerServiceError, DirectoryError};
pub use ports::CustomerDirectory;
