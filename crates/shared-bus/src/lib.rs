//! # Shared Bus - Message Bus for Inter-Service Communication
//!
//! The order, product and customer services never call each other directly.
//! Every exchange is a message published to a named topic under a key.
//!
//! ## Publish / Subscribe
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │  Service A   │                    │  Service B   │
//! │              │ publish(topic,key) │              │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Message Bus │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe(topic, group)
//! ```
//!
//! ## Delivery Guarantees
//!
//! - Messages with the same key reach a subscriber in publish order.
//! - No ordering is promised across keys.
//! - At-most-once: a subscriber that falls more than the channel capacity
//!   behind loses the oldest messages (logged at warn).
//! - Publishing to a closed bus fails with [`PublishError::Closed`].

pub mod consumer;
pub mod message;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use consumer::{spawn_consumer, MessageHandler};
pub use message::{BusMessage, TopicFilter};
pub use publisher::{encode_payload, InMemoryMessageBus, MessagePublisher, PublishError};
pub use subscriber::{MessageStream, MessageSubscriber, Subscription, SubscriptionError};

/// Maximum messages to buffer per subscriber before the oldest are dropped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacity() {
        assert_eq!(DEFAULT_CHANNEL_CAPACITY, 1000);
    }
}
