//! # Message Subscriber
//!
//! Defines the subscription side of the message bus.

use crate::message::{BusMessage, TopicFilter};
use futures::stream::{self, BoxStream, StreamExt};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The message bus was dropped.
    #[error("Message bus closed")]
    Closed,
}

/// Trait for subscribing to messages from the bus.
pub trait MessageSubscriber: Send + Sync {
    /// Subscribe to messages matching a filter.
    fn subscribe(&self, filter: TopicFilter) -> Subscription;
}

/// Stream of messages matching a subscription's filter.
pub type MessageStream = BoxStream<'static, BusMessage>;

/// A subscription handle for receiving messages.
///
/// When dropped, the subscription is automatically cleaned up.
pub struct Subscription {
    /// The broadcast receiver.
    receiver: broadcast::Receiver<BusMessage>,

    /// Filter for this subscription.
    filter: TopicFilter,

    /// Reference to group tracking (for cleanup).
    subscriptions: Arc<RwLock<HashMap<String, usize>>>,
}

impl Subscription {
    /// Create a new subscription.
    pub(crate) fn new(
        receiver: broadcast::Receiver<BusMessage>,
        filter: TopicFilter,
        subscriptions: Arc<RwLock<HashMap<String, usize>>>,
    ) -> Self {
        Self {
            receiver,
            filter,
            subscriptions,
        }
    }

    /// Receive the next message that matches the filter.
    ///
    /// # Returns
    ///
    /// - `Some(message)` - The next matching message
    /// - `None` - The channel was closed (bus dropped)
    pub async fn recv(&mut self) -> Option<BusMessage> {
        loop {
            let message = match self.receiver.recv().await {
                Ok(m) => m,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    self.report_lag(count);
                    continue;
                }
            };

            if self.filter.matches(&message) {
                return Some(message);
            }
        }
    }

    /// Try to receive the next message without blocking.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(message))` - A message was available and matched
    /// - `Ok(None)` - No message available (would block)
    /// - `Err(SubscriptionError::Closed)` - The channel was closed
    pub fn try_recv(&mut self) -> Result<Option<BusMessage>, SubscriptionError> {
        loop {
            let message = match self.receiver.try_recv() {
                Ok(m) => m,
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
                Err(broadcast::error::TryRecvError::Lagged(count)) => {
                    self.report_lag(count);
                    continue;
                }
            };

            if self.filter.matches(&message) {
                return Ok(Some(message));
            }
        }
    }

    fn report_lag(&self, count: u64) {
        warn!(
            group = %self.filter.group_id,
            lagged = count,
            "Subscriber lagged, some messages dropped"
        );
    }

    /// Get the filter for this subscription.
    #[must_use]
    pub fn filter(&self) -> &TopicFilter {
        &self.filter
    }

    /// Turn the subscription into a `Stream` of matching messages.
    ///
    /// The stream ends when the bus is dropped.
    #[must_use]
    pub fn into_stream(self) -> MessageStream {
        stream::unfold(self, |mut subscription| async move {
            let message = subscription.recv().await?;
            Some((message, subscription))
        })
        .boxed()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let group = &self.filter.group_id;
        let Ok(mut subs) = self.subscriptions.write() else {
            return;
        };
        let Some(count) = subs.get_mut(group) else {
            debug!(group = %group, "Subscription dropped");
            return;
        };

        *count = count.saturating_sub(1);
        if *count == 0 {
            subs.remove(group);
        }
        debug!(group = %group, "Subscription dropped");
    }
}
