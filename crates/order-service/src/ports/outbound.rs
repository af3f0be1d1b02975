//! Outbound ports: what the order service needs from the outside world.

use crate::domain::error::OrderError;
use crate::domain::order::{NewOrder, Order, OrderStatus};
use async_trait::async_trait;
use shared_types::{CustomerId, OrderCreatedEvent, OrderId};

/// Order persistence.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Store a new order under the next sequential ID.
    async fn save(&self, order: NewOrder) -> Result<Order, OrderError>;

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, OrderError>;

    /// All orders, ascending by ID.
    async fn find_all(&self) -> Result<Vec<Order>, OrderError>;

    /// Orders placed by `customer_id`, ascending by ID.
    async fn find_by_customer(&self, customer_id: CustomerId) -> Result<Vec<Order>, OrderError>;

    /// Returns the updated order, or `None` if it does not exist.
    async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Option<Order>, OrderError>;

    /// Returns false if the order does not exist.
    async fn delete(&self, id: OrderId) -> Result<bool, OrderError>;
}

/// Announces order lifecycle events.
#[async_trait]
pub trait OrderEventPublisher: Send + Sync {
    async fn order_created(&self, event: &OrderCreatedEvent) -> Result<(), OrderError>;
}
