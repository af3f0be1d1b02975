//! Bus adapters for the product service.
//!
//! - [`ProductValidationConsumer`]: `validate-product-request` → catalog →
//!   `product-validation-response`, keyed by the request's correlation ID.
//! - [`OrderEventConsumer`]: logs `order-created` announcements.

use crate::domain::PRODUCT_NOT_FOUND;
use crate::error::ProductServiceError;
use crate::ports::ProductCatalog;
use async_trait::async_trait;
use shared_bus::{encode_payload, BusMessage, MessageHandler, MessagePublisher, TopicFilter};
use shared_types::{
    OrderCreatedEvent, ProductValidationResponse, ValidateProductRequest, ORDER_CREATED_TOPIC,
    PRODUCT_SERVICE_GROUP, PRODUCT_VALIDATION_RESPONSE_TOPIC, VALIDATE_PRODUCT_REQUEST_TOPIC,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Answers product validation requests from a [`ProductCatalog`].
pub struct ProductValidationConsumer {
    catalog: Arc<dyn ProductCatalog>,
    publisher: Arc<dyn MessagePublisher>,
}

impl ProductValidationConsumer {
    pub fn new(catalog: Arc<dyn ProductCatalog>, publisher: Arc<dyn MessagePublisher>) -> Self {
        Self { catalog, publisher }
    }

    pub fn filter() -> TopicFilter {
        TopicFilter::topic(PRODUCT_SERVICE_GROUP, VALIDATE_PRODUCT_REQUEST_TOPIC)
    }

    /// Build the reply for `request`.
    pub async fn answer(
        &self,
        request: &ValidateProductRequest,
    ) -> Result<ProductValidationResponse, ProductServiceError> {
        let reply = match self.catalog.find(request.product_id).await? {
            Some(product) => product.validation_reply(request.correlation_id),
            None => ProductValidationResponse::rejected(
                request.correlation_id,
                request.product_id,
                PRODUCT_NOT_FOUND,
            ),
        };
        Ok(reply)
    }

    async fn process(&self, message: &BusMessage) -> Result<(), ProductServiceError> {
        let request: ValidateProductRequest = message.decode()?;
        info!(
            correlation_id = %request.correlation_id,
            product_id = request.product_id,
            quantity = request.quantity,
            "Received product validation request"
        );

        let reply = self.answer(&request).await?;
        let payload = encode_payload(PRODUCT_VALIDATION_RESPONSE_TOPIC, &reply)?;
        self.publisher
            .publish(
                PRODUCT_VALIDATION_RESPONSE_TOPIC,
                &request.correlation_id.as_key(),
                payload,
            )
            .await?;

        info!(
            correlation_id = %request.correlation_id,
            valid = reply.valid,
            "Sent product validation response"
        );
        Ok(())
    }
}

#[async_trait]
impl MessageHandler for ProductValidationConsumer {
    async fn handle(&self, message: BusMessage) {
        // No reply on failure; the requester's timeout covers it
        if let Err(e) = self.process(&message).await {
            error!(
                topic = %message.topic,
                key = %message.key,
                error = %e,
                "Failed to answer product validation request"
            );
        }
    }
}

/// Logs every `order-created` announcement.
#[derive(Default)]
pub struct OrderEventConsumer {
    seen: AtomicU64,
}

impl OrderEventConsumer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter() -> TopicFilter {
        TopicFilter::topic(PRODUCT_SERVICE_GROUP, ORDER_CREATED_TOPIC)
    }

    /// Number of order events handled so far.
    pub fn orders_seen(&self) -> u64 {
        self.seen.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl MessageHandler for OrderEventConsumer {
    async fn handle(&self, message: BusMessage) {
        match message.decode::<OrderCreatedEvent>() {
            Ok(event) => {
                self.seen.fetch_add(1, Ordering::Relaxed);
                info!(
                    order_id = event.order_id,
                    product_id = event.product_id,
                    quantity = event.quantity,
                    "Product was ordered"
                );
            }
            Err(e) => debug!(key = %message.key, error = %e, "Ignoring undecodable order event"),
        }
    }
}
