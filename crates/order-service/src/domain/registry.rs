//! Correlation Registry - parks waiters until their reply arrives.
//!
//! Maps correlation IDs to the single-assignment slot of a request that is
//! waiting for a reply on the bus.
//!
//! Three parties touch an entry and never coordinate with each other:
//!
//! ```text
//! issuing flow ──register()──→ ┌────────────────────┐
//! dispatcher ────resolve()───→ │ CorrelationRegistry │ ──→ oneshot slot
//! timer task ────expire()────→ └────────────────────┘
//! ```
//!
//! Every transition starts by removing the entry from the map. Removal is
//! atomic per key, so whichever of `resolve`, `expire` or `cancel` removes it
//! is the only one that gets to fill (or drop) the slot.

use crate::domain::error::RegistryError;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use shared_types::CorrelationId;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tokio::sync::oneshot;
use tracing::{debug, error, warn};

/// Final value delivered to a waiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome<T> {
    /// The matching reply arrived in time.
    Resolved(T),
    /// No reply arrived before the deadline.
    TimedOut,
}

impl<T> ReplyOutcome<T> {
    pub fn is_resolved(&self) -> bool {
        matches!(self, ReplyOutcome::Resolved(_))
    }

    pub fn is_timed_out(&self) -> bool {
        matches!(self, ReplyOutcome::TimedOut)
    }

    /// The reply, if one arrived.
    pub fn into_reply(self) -> Option<T> {
        match self {
            ReplyOutcome::Resolved(reply) => Some(reply),
            ReplyOutcome::TimedOut => None,
        }
    }
}

/// A waiter parked in the registry
struct PendingWaiter<T> {
    /// Slot filled exactly once
    slot: oneshot::Sender<ReplyOutcome<T>>,
    /// When the waiter was registered
    created_at: Instant,
}

/// Statistics for a correlation registry
#[derive(Debug, Default)]
pub struct RegistryStats {
    /// Waiters registered
    pub total_registered: AtomicU64,
    /// Waiters filled with a reply
    pub total_resolved: AtomicU64,
    /// Waiters filled with a timeout
    pub total_expired: AtomicU64,
    /// Waiters removed without a value
    pub total_cancelled: AtomicU64,
    /// Replies that matched no waiter
    pub total_stale: AtomicU64,
}

/// Point-in-time copy of [`RegistryStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub registered: u64,
    pub resolved: u64,
    pub expired: u64,
    pub cancelled: u64,
    pub stale: u64,
}

impl RegistryStats {
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            registered: self.total_registered.load(Ordering::Relaxed),
            resolved: self.total_resolved.load(Ordering::Relaxed),
            expired: self.total_expired.load(Ordering::Relaxed),
            cancelled: self.total_cancelled.load(Ordering::Relaxed),
            stale: self.total_stale.load(Ordering::Relaxed),
        }
    }
}

/// Thread-safe map from correlation ID to pending waiter.
///
/// Flow:
/// 1. Client generates a CorrelationId
/// 2. Client calls `register()` to get a oneshot receiver
/// 3. Client publishes the request keyed by the CorrelationId
/// 4. Dispatcher receives the reply and calls `resolve()`,
///    or the timer fires first and calls `expire()`
pub struct CorrelationRegistry<T> {
    /// Name used in log lines ("product", "customer")
    name: &'static str,
    /// Map of correlation ID to pending waiter
    pending: DashMap<CorrelationId, PendingWaiter<T>>,
    /// Statistics
    stats: RegistryStats,
}

impl<T: Send + 'static> CorrelationRegistry<T> {
    /// Create an empty registry. `name` labels its log lines.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            pending: DashMap::new(),
            stats: RegistryStats::default(),
        }
    }

    /// Park a new waiter under `correlation_id`.
    ///
    /// Fails if a waiter with the same ID is still pending.
    pub fn register(
        &self,
        correlation_id: CorrelationId,
    ) -> Result<oneshot::Receiver<ReplyOutcome<T>>, RegistryError> {
        match self.pending.entry(correlation_id) {
            Entry::Occupied(_) => {
                error!(
                    registry = self.name,
                    correlation_id = %correlation_id,
                    "Correlation ID already pending"
                );
                Err(RegistryError::DuplicateCorrelationId(correlation_id))
            }
            Entry::Vacant(vacant) => {
                let (tx, rx) = oneshot::channel();
                vacant.insert(PendingWaiter {
                    slot: tx,
                    created_at: Instant::now(),
                });
                self.stats.total_registered.fetch_add(1, Ordering::Relaxed);

                debug!(
                    registry = self.name,
                    correlation_id = %correlation_id,
                    "Registered waiter"
                );
                Ok(rx)
            }
        }
    }

    /// Fill the waiter for `correlation_id` with `reply`.
    ///
    /// Returns false, and counts a stale reply, if no waiter is pending.
    pub fn resolve(&self, correlation_id: CorrelationId, reply: T) -> bool {
        let Some((_, waiter)) = self.pending.remove(&correlation_id) else {
            self.stats.total_stale.fetch_add(1, Ordering::Relaxed);
            warn!(
                registry = self.name,
                correlation_id = %correlation_id,
                "Stale reply for unknown or expired correlation ID, discarding"
            );
            return false;
        };

        self.stats.total_resolved.fetch_add(1, Ordering::Relaxed);
        let elapsed = waiter.created_at.elapsed();
        if waiter.slot.send(ReplyOutcome::Resolved(reply)).is_err() {
            // Handle was dropped before the reply arrived
            debug!(
                registry = self.name,
                correlation_id = %correlation_id,
                "Waiter abandoned before reply"
            );
        } else {
            debug!(
                registry = self.name,
                correlation_id = %correlation_id,
                response_time_ms = elapsed.as_millis() as u64,
                "Resolved waiter"
            );
        }
        true
    }

    /// Fill the waiter for `correlation_id` with [`ReplyOutcome::TimedOut`].
    ///
    /// Idempotent: returns false if the waiter is already gone.
    pub fn expire(&self, correlation_id: CorrelationId) -> bool {
        let Some((_, waiter)) = self.pending.remove(&correlation_id) else {
            return false;
        };

        self.stats.total_expired.fetch_add(1, Ordering::Relaxed);
        debug!(
            registry = self.name,
            correlation_id = %correlation_id,
            elapsed_ms = waiter.created_at.elapsed().as_millis() as u64,
            "Expired waiter"
        );
        let _ = waiter.slot.send(ReplyOutcome::TimedOut);
        true
    }

    /// Remove the waiter without filling it.
    ///
    /// The receiver observes a closed channel.
    pub fn cancel(&self, correlation_id: CorrelationId) -> bool {
        if self.pending.remove(&correlation_id).is_some() {
            self.stats.total_cancelled.fetch_add(1, Ordering::Relaxed);
            debug!(
                registry = self.name,
                correlation_id = %correlation_id,
                "Cancelled waiter"
            );
            true
        } else {
            false
        }
    }

    /// Get number of currently pending waiters
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Check if a correlation ID is pending
    pub fn is_pending(&self, correlation_id: &CorrelationId) -> bool {
        self.pending.contains_key(correlation_id)
    }

    /// Get statistics
    pub fn stats(&self) -> &RegistryStats {
        &self.stats
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn registry() -> CorrelationRegistry<String> {
        CorrelationRegistry::new("test")
    }

    #[tokio::test]
    async fn test_register_and_resolve() {
        let registry = registry();
        let id = CorrelationId::new();

        let rx = registry.register(id).unwrap();
        assert!(registry.is_pending(&id));
        assert_eq!(registry.pending_count(), 1);

        assert!(registry.resolve(id, "ok".to_string()));
        assert!(!registry.is_pending(&id));
        assert_eq!(rx.await.unwrap(), ReplyOutcome::Resolved("ok".to_string()));

        let stats = registry.stats().snapshot();
        assert_eq!(stats.registered, 1);
        assert_eq!(stats.resolved, 1);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let registry = registry();
        let id = CorrelationId::new();

        let _rx = registry.register(id).unwrap();
        assert_eq!(
            registry.register(id).unwrap_err(),
            RegistryError::DuplicateCorrelationId(id)
        );
        assert_eq!(registry.pending_count(), 1);
    }

    #[test]
    fn test_id_reusable_after_removal() {
        let registry = registry();
        let id = CorrelationId::new();

        let _first = registry.register(id).unwrap();
        assert!(registry.cancel(id));
        assert!(registry.register(id).is_ok());
    }

    #[test]
    fn test_unknown_reply_is_stale() {
        let registry = registry();
        let other = CorrelationId::new();
        let _rx = registry.register(other).unwrap();

        assert!(!registry.resolve(CorrelationId::new(), "late".to_string()));
        assert!(registry.is_pending(&other));
        assert_eq!(registry.stats().snapshot().stale, 1);
    }

    #[tokio::test]
    async fn test_expire_marks_timed_out() {
        let registry = registry();
        let id = CorrelationId::new();
        let rx = registry.register(id).unwrap();

        assert!(registry.expire(id));
        assert!(!registry.expire(id));
        assert_eq!(rx.await.unwrap(), ReplyOutcome::TimedOut);
        assert_eq!(registry.stats().snapshot().expired, 1);
    }

    #[test]
    fn test_reply_after_expiry_is_discarded() {
        let registry = registry();
        let id = CorrelationId::new();
        let _rx = registry.register(id).unwrap();

        assert!(registry.expire(id));
        assert!(!registry.resolve(id, "too late".to_string()));

        let stats = registry.stats().snapshot();
        assert_eq!(stats.expired, 1);
        assert_eq!(stats.resolved, 0);
        assert_eq!(stats.stale, 1);
    }

    #[tokio::test]
    async fn test_cancel_closes_receiver() {
        let registry = registry();
        let id = CorrelationId::new();
        let rx = registry.register(id).unwrap();

        assert!(registry.cancel(id));
        assert!(rx.await.is_err());
        assert_eq!(registry.pending_count(), 0);
        assert_eq!(registry.stats().snapshot().cancelled, 1);
    }

    #[test]
    fn test_resolve_with_dropped_receiver_still_removes() {
        let registry = registry();
        let id = CorrelationId::new();
        drop(registry.register(id).unwrap());

        assert!(registry.resolve(id, "nobody listening".to_string()));
        assert_eq!(registry.pending_count(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_resolve_and_expire_single_winner() {
        let registry = Arc::new(registry());

        for _ in 0..200 {
            let id = CorrelationId::new();
            let rx = registry.register(id).unwrap();

            let resolver = {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move { registry.resolve(id, "reply".to_string()) })
            };
            let expirer = {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move { registry.expire(id) })
            };

            let resolved = resolver.await.unwrap();
            let expired = expirer.await.unwrap();
            assert!(resolved ^ expired, "exactly one transition must win");

            match rx.await.unwrap() {
                ReplyOutcome::Resolved(_) => assert!(resolved),
                ReplyOutcome::TimedOut => assert!(expired),
            }
        }
        assert_eq!(registry.pending_count(), 0);
    }

    proptest! {
        /// Whatever order the transitions are applied in, only the first one
        /// removes the waiter and the slot carries its value.
        #[test]
        fn prop_first_transition_wins(ops in proptest::collection::vec(0u8..3, 1..8)) {
            let registry = CorrelationRegistry::<u8>::new("prop");
            let id = CorrelationId::new();
            let mut rx = registry.register(id).unwrap();

            let mut winners = 0;
            for (i, op) in ops.iter().enumerate() {
                let removed = match op {
                    0 => registry.resolve(id, i as u8),
                    1 => registry.expire(id),
                    _ => registry.cancel(id),
                };
                if removed {
                    winners += 1;
                    prop_assert_eq!(i, 0);
                }
            }
            prop_assert_eq!(winners, 1);
            prop_assert_eq!(registry.pending_count(), 0);

            let delivered = rx.try_recv();
            match ops[0] {
                0 => prop_assert_eq!(delivered.unwrap(), ReplyOutcome::Resolved(0)),
                1 => prop_assert_eq!(delivered.unwrap(), ReplyOutcome::TimedOut),
                _ => prop_assert!(delivered.is_err()),
            }
        }
    }
}
