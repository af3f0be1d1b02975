//! # Bus Messages
//!
//! Every record published on the bus. Field names are camelCase on the wire
//! and absent optionals are omitted rather than sent as `null`.
//!
//! ## Flow
//!
//! ```text
//! order-service ──ValidateProductRequest──→ product-service
//! order-service ←─ProductValidationResponse─ product-service
//! order-service ──ValidateCustomerRequest─→ customer-service
//! order-service ←CustomerValidationResponse─ customer-service
//! order-service ──OrderCreatedEvent───────→ (any listener)
//! ```

use crate::correlation::CorrelationId;
use crate::errors::ContractError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product identifier.
pub type ProductId = u64;

/// Customer identifier.
pub type CustomerId = u64;

/// Order identifier.
pub type OrderId = u64;

// =============================================================================
// PRODUCT VALIDATION
// =============================================================================

/// Request to validate a product for a given quantity.
/// Topic: `validate-product-request` | Key: correlation id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateProductRequest {
    pub correlation_id: CorrelationId,
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Reply to a product validation request.
/// Topic: `product-validation-response` | Key: correlation id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductValidationResponse {
    pub correlation_id: CorrelationId,
    pub product_id: ProductId,
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ProductValidationResponse {
    /// The product exists: carries its name and unit price.
    pub fn valid(
        correlation_id: CorrelationId,
        product_id: ProductId,
        product_name: impl Into<String>,
        price: Decimal,
    ) -> Self {
        Self {
            correlation_id,
            product_id,
            valid: true,
            product_name: Some(product_name.into()),
            price: Some(price),
            error_message: None,
        }
    }

    /// The product was rejected for `reason`.
    pub fn rejected(
        correlation_id: CorrelationId,
        product_id: ProductId,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            correlation_id,
            product_id,
            valid: false,
            product_name: None,
            price: None,
            error_message: Some(reason.into()),
        }
    }
}

// =============================================================================
// CUSTOMER VALIDATION
// =============================================================================

/// Request to validate a customer.
/// Topic: `validate-customer-request` | Key: correlation id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateCustomerRequest {
    pub correlation_id: CorrelationId,
    pub customer_id: CustomerId,
}

/// Reply to a customer validation request.
/// Topic: `customer-validation-response` | Key: correlation id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerValidationResponse {
    pub correlation_id: CorrelationId,
    pub customer_id: CustomerId,
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl CustomerValidationResponse {
    /// The customer exists.
    pub fn valid(
        correlation_id: CorrelationId,
        customer_id: CustomerId,
        customer_name: impl Into<String>,
    ) -> Self {
        Self {
            correlation_id,
            customer_id,
            valid: true,
            customer_name: Some(customer_name.into()),
            error_message: None,
        }
    }

    /// The customer was rejected for `reason`.
    pub fn rejected(
        correlation_id: CorrelationId,
        customer_id: CustomerId,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            correlation_id,
            customer_id,
            valid: false,
            customer_name: None,
            error_message: Some(reason.into()),
        }
    }
}

// =============================================================================
// REPLY CONTRACT
// =============================================================================

/// Common view over validation replies.
pub trait ValidationReply {
    /// Correlation of the request this reply answers.
    fn correlation_id(&self) -> CorrelationId;

    /// Whether the subject passed validation.
    fn is_valid(&self) -> bool;

    /// Rejection reason, present only when `is_valid()` is false.
    fn error_message(&self) -> Option<&str>;

    /// Check that a rejection carries a reason and an acceptance does not.
    fn check_contract(&self) -> Result<(), ContractError> {
        let has_message = self.error_message().is_some_and(|m| !m.trim().is_empty());
        match (self.is_valid(), has_message) {
            (false, false) => Err(ContractError::MissingErrorMessage {
                correlation_id: self.correlation_id(),
            }),
            (true, _) if self.error_message().is_some() => {
                Err(ContractError::UnexpectedErrorMessage {
                    correlation_id: self.correlation_id(),
                })
            }
            _ => Ok(()),
        }
    }
}

impl ValidationReply for ProductValidationResponse {
    fn correlation_id(&self) -> CorrelationId {
        self.correlation_id
    }

    fn is_valid(&self) -> bool {
        self.valid
    }

    fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

impl ValidationReply for CustomerValidationResponse {
    fn correlation_id(&self) -> CorrelationId {
        self.correlation_id
    }

    fn is_valid(&self) -> bool {
        self.valid
    }

    fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

// =============================================================================
// ORDER EVENTS
// =============================================================================

/// Announcement of a committed order.
/// Topic: `order-created` | Key: order id (string form)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreatedEvent {
    pub order_id: OrderId,
    pub customer_id: CustomerId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
}

impl OrderCreatedEvent {
    /// Message key for this event.
    pub fn key(&self) -> String {
        self.order_id.to_string()
    }
}
