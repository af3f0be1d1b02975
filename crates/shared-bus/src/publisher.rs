//! # Message Publisher
//!
//! Defines the publishing side of the message bus.

use crate::message::{BusMessage, TopicFilter};
use crate::subscriber::{MessageStream, MessageSubscriber, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Errors from publish operations.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The bus was closed; nothing more can be published.
    #[error("message bus closed")]
    Closed,

    /// The payload could not be encoded as JSON.
    #[error("failed to encode payload for topic {topic}: {source}")]
    Encode {
        topic: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Encode a typed record as a JSON payload for `topic`.
pub fn encode_payload<T: Serialize>(topic: &str, value: &T) -> Result<serde_json::Value, PublishError> {
    serde_json::to_value(value).map_err(|source| PublishError::Encode {
        topic: topic.to_string(),
        source,
    })
}

/// Trait for publishing messages to the bus.
///
/// This is the interface services use to emit requests, replies and
/// notifications for consumption by other services.
#[async_trait]
pub trait MessagePublisher: Send + Sync {
    /// Publish a payload to `topic` under `key`.
    ///
    /// # Returns
    ///
    /// The number of active subscriptions that received the message. Zero is
    /// not an error: like a broker, the bus accepts messages nobody reads.
    async fn publish(
        &self,
        topic: &str,
        key: &str,
        payload: serde_json::Value,
    ) -> Result<usize, PublishError>;

    /// Get the total number of messages accepted for publishing.
    fn messages_published(&self) -> u64;
}

/// In-memory implementation of the message bus.
///
/// Uses `tokio::sync::broadcast` for multi-producer, multi-consumer
/// semantics. A single channel carries every topic, so publish order is
/// total and per-key ordering follows. Suitable for single-process
/// deployments; a broker-backed implementation would replace it.
pub struct InMemoryMessageBus {
    /// Broadcast sender for messages.
    sender: broadcast::Sender<BusMessage>,

    /// Active subscription count by consumer group.
    subscriptions: Arc<RwLock<HashMap<String, usize>>>,

    /// Next offset to assign.
    next_offset: AtomicU64,

    /// Set once the bus stops accepting messages.
    closed: AtomicBool,

    /// Channel capacity.
    capacity: usize,
}

impl InMemoryMessageBus {
    /// Create a new in-memory bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new in-memory bus with specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            subscriptions: Arc::new(RwLock::new(HashMap::new())),
            next_offset: AtomicU64::new(0),
            closed: AtomicBool::new(false),
            capacity: capacity.max(1),
        }
    }

    /// Subscribe to messages matching a filter.
    ///
    /// Returns a `Subscription` handle that can be used to receive messages.
    /// Each subscription sees every matching message published after it was
    /// created; the group id is used for bookkeeping and logging.
    #[must_use]
    pub fn subscribe(&self, filter: TopicFilter) -> Subscription {
        let receiver = self.sender.subscribe();
        let group = filter.group_id.clone();

        if let Ok(mut subs) = self.subscriptions.write() {
            *subs.entry(group.clone()).or_insert(0) += 1;
        }

        debug!(group = %group, topics = ?filter.topics, "New subscription created");

        Subscription::new(receiver, filter, self.subscriptions.clone())
    }

    /// Get a stream of messages matching a filter.
    #[must_use]
    pub fn message_stream(&self, filter: TopicFilter) -> MessageStream {
        self.subscribe(filter).into_stream()
    }

    /// Stop accepting messages. Existing subscriptions drain what was
    /// already published.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            debug!("Message bus closed");
        }
    }

    /// Whether `close()` has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Get the number of active subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Get the number of active subscriptions for a consumer group.
    #[must_use]
    pub fn group_members(&self, group_id: &str) -> usize {
        self.subscriptions
            .read()
            .ok()
            .and_then(|subs| subs.get(group_id).copied())
            .unwrap_or(0)
    }

    /// Get the channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryMessageBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagePublisher for InMemoryMessageBus {
    async fn publish(
        &self,
        topic: &str,
        key: &str,
        payload: serde_json::Value,
    ) -> Result<usize, PublishError> {
        if self.is_closed() {
            warn!(topic = topic, key = key, "Publish rejected (bus closed)");
            return Err(PublishError::Closed);
        }

        let message = BusMessage {
            topic: topic.to_string(),
            key: key.to_string(),
            payload,
            offset: self.next_offset.fetch_add(1, Ordering::Relaxed),
            published_at: Utc::now(),
        };
        let offset = message.offset;

        match self.sender.send(message) {
            Ok(receiver_count) => {
                debug!(
                    topic = topic,
                    key = key,
                    offset = offset,
                    receivers = receiver_count,
                    "Message published"
                );
                Ok(receiver_count)
            }
            Err(_) => {
                // No receivers - the message is accepted and dropped
                debug!(topic = topic, key = key, offset = offset, "Message published (no receivers)");
                Ok(0)
            }
        }
    }

    fn messages_published(&self) -> u64 {
        self.next_offset.load(Ordering::Relaxed)
    }
}

impl MessageSubscriber for InMemoryMessageBus {
    fn subscribe(&self, filter: TopicFilter) -> Subscription {
        InMemoryMessageBus::subscribe(self, filter)
    }
}
