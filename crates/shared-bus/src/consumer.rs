//! # Consumers
//!
//! Runs a handler over every message of a subscription. Messages are handled
//! one at a time, so a handler observes same-key messages in publish order.

use crate::message::{BusMessage, TopicFilter};
use crate::subscriber::MessageSubscriber;
use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Handles messages delivered to a consumer group.
#[async_trait]
pub trait MessageHandler: Send + Sync + 'static {
    /// Process one message. Failures are the handler's to log; the consumer
    /// keeps running regardless.
    async fn handle(&self, message: BusMessage);
}

/// Subscribe `handler` to the topics in `filter` and drive it on a
/// background task until the bus is dropped or the task is aborted.
///
/// The subscription is taken before this function returns, so messages
/// published afterwards are never missed.
pub fn spawn_consumer<S, H>(bus: &S, filter: TopicFilter, handler: Arc<H>) -> JoinHandle<()>
where
    S: MessageSubscriber + ?Sized,
    H: MessageHandler,
{
    let group = filter.group_id.clone();
    let topics = filter.topics.clone();
    let mut stream = bus.subscribe(filter).into_stream();

    tokio::spawn(async move {
        info!(group = %group, topics = ?topics, "Consumer started");
        while let Some(message) = stream.next().await {
            debug!(
                group = %group,
                topic = %message.topic,
                key = %message.key,
                offset = message.offset,
                "Dispatching message"
            );
            handler.handle(message).await;
        }
        info!(group = %group, "Consumer stopped (bus dropped)");
    })
}
