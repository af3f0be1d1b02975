//! Request/reply over the message bus.
//!
//! A request is published keyed by a fresh correlation ID. The returned
//! [`ReplyHandle`] completes when the dispatcher resolves that ID or when the
//! per-request timer expires it, whichever removes the waiter first.

use crate::domain::error::OrderError;
use crate::domain::registry::{CorrelationRegistry, ReplyOutcome};
use serde::Serialize;
use shared_bus::{encode_payload, MessagePublisher};
use shared_types::CorrelationId;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::AbortHandle;
use tracing::{debug, error, info, warn};

/// Per-request state machine.
///
/// `Issued → Pending → {Resolved | TimedOut}`. Both terminal states are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    /// Waiter registered, request not yet on the bus
    Issued,
    /// Request published, waiting for the reply or the deadline
    Pending,
    /// Reply delivered
    Resolved,
    /// Deadline passed first
    TimedOut,
}

impl RequestState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestState::Resolved | RequestState::TimedOut)
    }
}

/// Future completing with the reply to one request, or with a timeout.
///
/// The timer is armed as soon as the waiter is registered. Dropping the
/// handle, or the `request` future before it returns, does not leak the
/// waiter: the timer still expires it.
#[must_use = "a reply handle does nothing unless awaited"]
#[derive(Debug)]
pub struct ReplyHandle<T> {
    correlation_id: CorrelationId,
    state: RequestState,
    receiver: oneshot::Receiver<ReplyOutcome<T>>,
    timer: Option<AbortHandle>,
}

impl<T> ReplyHandle<T> {
    fn issued(
        correlation_id: CorrelationId,
        receiver: oneshot::Receiver<ReplyOutcome<T>>,
        timer: AbortHandle,
    ) -> Self {
        Self {
            correlation_id,
            state: RequestState::Issued,
            receiver,
            timer: Some(timer),
        }
    }

    fn published(&mut self) {
        self.state = RequestState::Pending;
    }

    /// Stop the timer of a request that never made it onto the bus.
    fn abandon(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    fn finish(&mut self, state: RequestState) {
        self.state = state;
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    /// Correlation ID the request was published under.
    pub fn correlation_id(&self) -> CorrelationId {
        self.correlation_id
    }

    pub fn state(&self) -> RequestState {
        self.state
    }
}

impl<T> Future for ReplyHandle<T> {
    type Output = ReplyOutcome<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = &mut *self;
        match Pin::new(&mut this.receiver).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(ReplyOutcome::Resolved(reply))) => {
                this.finish(RequestState::Resolved);
                Poll::Ready(ReplyOutcome::Resolved(reply))
            }
            Poll::Ready(Ok(ReplyOutcome::TimedOut)) => {
                this.finish(RequestState::TimedOut);
                Poll::Ready(ReplyOutcome::TimedOut)
            }
            Poll::Ready(Err(_)) => {
                // Waiter removed without a value; nothing will ever arrive
                this.finish(RequestState::TimedOut);
                Poll::Ready(ReplyOutcome::TimedOut)
            }
        }
    }
}

/// Publishes correlated requests and hands back reply futures.
pub struct RequestReplyClient<T> {
    /// Waiters for replies of type `T`
    registry: Arc<CorrelationRegistry<T>>,
    /// Outgoing bus
    publisher: Arc<dyn MessagePublisher>,
    /// Deadline used when the caller gives none
    default_timeout: Duration,
}

impl<T: Send + 'static> RequestReplyClient<T> {
    pub fn new(
        registry: Arc<CorrelationRegistry<T>>,
        publisher: Arc<dyn MessagePublisher>,
        default_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            publisher,
            default_timeout,
        }
    }

    /// Publish the payload built by `build` to `topic` and return a handle
    /// for its reply.
    ///
    /// The waiter is registered and its timer armed before anything is
    /// published, so a reply that beats the publish call back is still
    /// matched and a caller that gives up mid-publish leaves nothing behind.
    /// If encoding or publishing fails the waiter is cancelled and the error
    /// returned.
    pub async fn request<P, F>(
        &self,
        topic: &str,
        build: F,
        timeout: Option<Duration>,
    ) -> Result<ReplyHandle<T>, OrderError>
    where
        F: FnOnce(CorrelationId) -> P,
        P: Serialize,
    {
        let timeout = timeout.unwrap_or(self.default_timeout);
        let correlation_id = CorrelationId::new();

        // Register pending waiter, then arm its deadline
        let receiver = self.registry.register(correlation_id)?;
        let timer = self.spawn_timer(correlation_id, topic, timeout);
        let mut handle = ReplyHandle::issued(correlation_id, receiver, timer);

        let payload = match encode_payload(topic, &build(correlation_id)) {
            Ok(payload) => payload,
            Err(e) => {
                handle.abandon();
                self.registry.cancel(correlation_id);
                error!(
                    correlation_id = %correlation_id,
                    topic = topic,
                    error = %e,
                    "Failed to encode request"
                );
                return Err(e.into());
            }
        };

        if let Err(e) = self
            .publisher
            .publish(topic, &correlation_id.as_key(), payload)
            .await
        {
            // Remove from pending if publish fails
            handle.abandon();
            self.registry.cancel(correlation_id);
            error!(
                correlation_id = %correlation_id,
                topic = topic,
                error = %e,
                "Failed to publish request"
            );
            return Err(e.into());
        }

        handle.published();

        info!(
            correlation_id = %correlation_id,
            topic = topic,
            timeout_ms = timeout.as_millis() as u64,
            "Sent request"
        );
        Ok(handle)
    }

    fn spawn_timer(&self, correlation_id: CorrelationId, topic: &str, timeout: Duration) -> AbortHandle {
        let registry = Arc::clone(&self.registry);
        let topic = topic.to_string();

        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            if registry.expire(correlation_id) {
                warn!(
                    correlation_id = %correlation_id,
                    topic = %topic,
                    timeout_ms = timeout.as_millis() as u64,
                    "Request timed out waiting for reply"
                );
            } else {
                debug!(correlation_id = %correlation_id, "Timer fired after reply");
            }
        })
        .abort_handle()
    }

    /// Get pending request count
    pub fn pending_count(&self) -> usize {
        self.registry.pending_count()
    }

    pub fn registry(&self) -> &Arc<CorrelationRegistry<T>> {
        &self.registry
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }
}
