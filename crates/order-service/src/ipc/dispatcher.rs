//! Reply dispatcher: routes validation replies back to their waiters.

use crate::domain::registry::CorrelationRegistry;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use shared_bus::{BusMessage, MessageHandler, TopicFilter};
use shared_types::{
    CustomerValidationResponse, ProductValidationResponse, ValidationReply,
    CUSTOMER_VALIDATION_RESPONSE_TOPIC, PRODUCT_VALIDATION_RESPONSE_TOPIC,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Consumes the validation reply topics and resolves the matching waiter.
///
/// Never retries. Undecodable payloads and replies for unknown IDs are
/// logged and dropped; neither stops the dispatcher.
pub struct ReplyDispatcher {
    products: Arc<CorrelationRegistry<ProductValidationResponse>>,
    customers: Arc<CorrelationRegistry<CustomerValidationResponse>>,
}

impl ReplyDispatcher {
    pub fn new(
        products: Arc<CorrelationRegistry<ProductValidationResponse>>,
        customers: Arc<CorrelationRegistry<CustomerValidationResponse>>,
    ) -> Self {
        Self {
            products,
            customers,
        }
    }

    /// Subscription covering both reply topics for `group_id`.
    pub fn filter(group_id: &str) -> TopicFilter {
        TopicFilter::topics(
            group_id,
            [
                PRODUCT_VALIDATION_RESPONSE_TOPIC,
                CUSTOMER_VALIDATION_RESPONSE_TOPIC,
            ],
        )
    }

    /// Returns true if the reply resolved a pending waiter.
    pub fn handle_product_response(&self, message: &BusMessage) -> bool {
        dispatch(&self.products, message)
    }

    /// Returns true if the reply resolved a pending waiter.
    pub fn handle_customer_response(&self, message: &BusMessage) -> bool {
        dispatch(&self.customers, message)
    }
}

#[async_trait]
impl MessageHandler for ReplyDispatcher {
    async fn handle(&self, message: BusMessage) {
        match message.topic.as_str() {
            PRODUCT_VALIDATION_RESPONSE_TOPIC => {
                self.handle_product_response(&message);
            }
            CUSTOMER_VALIDATION_RESPONSE_TOPIC => {
                self.handle_customer_response(&message);
            }
            other => debug!(topic = other, "Ignoring message on unrelated topic"),
        }
    }
}

fn dispatch<R>(registry: &CorrelationRegistry<R>, message: &BusMessage) -> bool
where
    R: ValidationReply + DeserializeOwned + Send + 'static,
{
    let reply: R = match message.decode() {
        Ok(reply) => reply,
        Err(e) => {
            warn!(
                topic = %message.topic,
                key = %message.key,
                offset = message.offset,
                error = %e,
                "Dropping undecodable reply"
            );
            return false;
        }
    };

    if let Err(violation) = reply.check_contract() {
        warn!(topic = %message.topic, error = %violation, "Reply breaks validation contract");
    }

    let correlation_id = reply.correlation_id();
    if message.key != correlation_id.as_key() {
        debug!(
            correlation_id = %correlation_id,
            key = %message.key,
            "Reply key differs from correlation ID"
        );
    }

    registry.resolve(correlation_id, reply)
}
