//! Order creation and management.

use crate::domain::error::OrderError;
use crate::domain::order::{NewOrder, Order, OrderDecision, OrderStatus};
use crate::ports::outbound::{OrderEventPublisher, OrderRepository};
use crate::service::validation::{ValidationService, ValidationVerdict};
use chrono::Utc;
use rust_decimal::Decimal;
use shared_types::{CustomerId, OrderId, ProductId};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

pub const QUANTITY_MUST_BE_POSITIVE: &str = "Quantity must be positive";

/// Validates, stores and announces orders.
pub struct OrderService {
    validation: ValidationService,
    repository: Arc<dyn OrderRepository>,
    events: Arc<dyn OrderEventPublisher>,
}

impl OrderService {
    pub fn new(
        validation: ValidationService,
        repository: Arc<dyn OrderRepository>,
        events: Arc<dyn OrderEventPublisher>,
    ) -> Self {
        Self {
            validation,
            repository,
            events,
        }
    }

    /// Validate product and customer concurrently, then store the order and
    /// publish `order-created`.
    ///
    /// Validation failures and timeouts come back as
    /// [`OrderDecision::Rejected`]; only infrastructure failures are errors.
    /// Once the order is stored it is accepted: a failed `order-created`
    /// publish is logged, not returned.
    #[instrument(skip(self))]
    pub async fn create_order(
        &self,
        customer_id: CustomerId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<OrderDecision, OrderError> {
        if quantity == 0 {
            return Ok(OrderDecision::rejected(QUANTITY_MUST_BE_POSITIVE));
        }

        let product = match self
            .validation
            .validate(customer_id, product_id, quantity)
            .await?
        {
            ValidationVerdict::Approved { product, .. } => product,
            ValidationVerdict::Rejected { reason } => {
                warn!(reason = %reason, "Order rejected");
                return Ok(OrderDecision::Rejected { reason });
            }
        };

        let unit_price = product.price.ok_or_else(|| OrderError::MalformedReply {
            correlation_id: product.correlation_id,
            reason: "valid product reply carries no price".into(),
        })?;
        let total_price = unit_price * Decimal::from(quantity);

        let order = self
            .repository
            .save(NewOrder {
                customer_id,
                product_id,
                quantity,
                total_price,
                status: OrderStatus::Confirmed,
                created_at: Utc::now(),
            })
            .await?;

        if let Err(e) = self.events.order_created(&order.created_event()).await {
            error!(order_id = order.id, error = %e, "Failed to publish order-created event");
        }

        info!(order_id = order.id, total_price = %order.total_price, "Order created");
        Ok(OrderDecision::Accepted(order))
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>, OrderError> {
        self.repository.find_all().await
    }

    pub async fn get_order(&self, id: OrderId) -> Result<Option<Order>, OrderError> {
        self.repository.find_by_id(id).await
    }

    pub async fn orders_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Order>, OrderError> {
        self.repository.find_by_customer(customer_id).await
    }

    /// Returns `None` if the order does not exist.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Option<Order>, OrderError> {
        let updated = self.repository.update_status(id, status).await?;
        if updated.is_some() {
            info!(order_id = id, status = ?status, "Order status updated");
        }
        Ok(updated)
    }

    /// Returns false if the order does not exist.
    pub async fn delete_order(&self, id: OrderId) -> Result<bool, OrderError> {
        let deleted = self.repository.delete(id).await?;
        if deleted {
            info!(order_id = id, "Order deleted");
        }
        Ok(deleted)
    }

    /// Validation requests still awaiting a reply or timeout.
    pub fn pending_validations(&self) -> usize {
        self.validation.pending_count()
    }
}
