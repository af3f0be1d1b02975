//! Orders and the decision returned by order creation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared_types::{CustomerId, OrderCreatedEvent, OrderId, ProductId};

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

/// An order ready to be stored; the repository assigns its ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub customer_id: CustomerId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub total_price: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// A stored order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub total_price: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn from_new(id: OrderId, new: NewOrder) -> Self {
        Self {
            id,
            customer_id: new.customer_id,
            product_id: new.product_id,
            quantity: new.quantity,
            total_price: new.total_price,
            status: new.status,
            created_at: new.created_at,
        }
    }

    /// The `order-created` announcement for this order.
    pub fn created_event(&self) -> OrderCreatedEvent {
        OrderCreatedEvent {
            order_id: self.id,
            customer_id: self.customer_id,
            product_id: self.product_id,
            quantity: self.quantity,
            total_price: self.total_price,
            created_at: self.created_at,
        }
    }
}

/// Outcome of an order creation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderDecision {
    /// Both validations passed and the order was stored
    Accepted(Order),
    /// A validation failed or timed out
    Rejected { reason: String },
}

impl OrderDecision {
    pub fn rejected(reason: impl Into<String>) -> Self {
        OrderDecision::Rejected {
            reason: reason.into(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, OrderDecision::Accepted(_))
    }

    pub fn order(&self) -> Option<&Order> {
        match self {
            OrderDecision::Accepted(order) => Some(order),
            OrderDecision::Rejected { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            OrderDecision::Accepted(_) => None,
            OrderDecision::Rejected { reason } => Some(reason),
        }
    }
}
