use serde::{Deserialize, Serialize};
use shared_types::CustomerId;

/// Rejection reason for unknown customers.
pub const CUSTOMER_NOT_FOUND: &str = "Customer not found";

/// A registered customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
}

impl Customer {
    pub fn new(id: CustomerId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }
}
