//! Application services.

pub mod orders;
pub mod validation;

pub use orders::{OrderService, QUANTITY_MUST_BE_POSITIVE};
pub use validation::{
    ValidationService, ValidationVerdict, CUSTOMER_FAILED_REASON, CUSTOMER_TIMEOUT_REASON,
    PRODUCT_FAILED_REASON, PRODUCT_TIMEOUT_REASON,
};
