//! Publishes order events to the bus.

use crate::domain::error::OrderError;
use crate::ports::outbound::OrderEventPublisher;
use async_trait::async_trait;
use shared_bus::{encode_payload, MessagePublisher};
use shared_types::{OrderCreatedEvent, ORDER_CREATED_TOPIC};
use std::sync::Arc;
use tracing::{error, info};

/// Sends `order-created` events keyed by order ID.
pub struct OrderEventProducer {
    publisher: Arc<dyn MessagePublisher>,
}

impl OrderEventProducer {
    pub fn new(publisher: Arc<dyn MessagePublisher>) -> Self {
        Self { publisher }
    }
}

#[async_trait]
impl OrderEventPublisher for OrderEventProducer {
    async fn order_created(&self, event: &OrderCreatedEvent) -> Result<(), OrderError> {
        let payload = encode_payload(ORDER_CREATED_TOPIC, event)?;

        match self
            .publisher
            .publish(ORDER_CREATED_TOPIC, &event.key(), payload)
            .await
        {
            Ok(delivered) => {
                info!(
                    order_id = event.order_id,
                    subscribers = delivered,
                    "Published order-created event"
                );
                Ok(())
            }
            Err(e) => {
                error!(order_id = event.order_id, error = %e, "Failed to publish order-created event");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use shared_bus::{InMemoryMessageBus, PublishError, TopicFilter};

    fn event() -> OrderCreatedEvent {
        OrderCreatedEvent {
            order_id: 12,
            customer_id: 1,
            product_id: 1,
            quantity: 5,
            total_price: dec!(100.00),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_event_keyed_by_order_id() {
        let bus = Arc::new(InMemoryMessageBus::new());
        let mut sub = bus.subscribe(TopicFilter::topic("listener", ORDER_CREATED_TOPIC));
        let producer = OrderEventProducer::new(bus.clone());

        let event = event();
        producer.order_created(&event).await.unwrap();

        let message = sub.recv().await.unwrap();
        assert_eq!(message.key, "12");
        assert_eq!(message.decode::<OrderCreatedEvent>().unwrap(), event);
        assert_eq!(message.payload["totalPrice"], serde_json::json!("100.00"));
    }

    #[tokio::test]
    async fn test_closed_bus_propagates() {
        let bus = Arc::new(InMemoryMessageBus::new());
        bus.close();
        let producer = OrderEventProducer::new(bus);

        assert!(matches!(
            producer.order_created(&event()).await,
            Err(OrderError::Publish(PublishError::Closed))
        ));
    }
}
