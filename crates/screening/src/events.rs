//! In-process publish/subscribe channel for scan notifications.
//!
//! Handlers for a topic run synchronously in subscription order. Every
//! subscription hands back a token whose `unsubscribe` is idempotent and
//! removes exactly one registration. Delivery is in-memory only.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::trace;

use crate::token::TokenScanResult;
use crate::ScanSummary;

/// Topics carried by the scan event bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanTopic {
    /// A scan cycle finished committing its results
    ScanComplete,

    /// A mint was seen for the first time
    NewToken,
}

/// Event published on the scan bus
#[derive(Debug, Clone)]
pub enum ScanEvent {
    /// A scan cycle finished committing its results
    ScanComplete(ScanSummary),

    /// A mint was seen for the first time
    NewToken(TokenScanResult),
}

impl ScanEvent {
    /// Topic this event is delivered on
    pub fn topic(&self) -> ScanTopic {
        match self {
            ScanEvent::ScanComplete(_) => ScanTopic::ScanComplete,
            ScanEvent::NewToken(_) => ScanTopic::NewToken,
        }
    }
}

type Handler = Arc<dyn Fn(&ScanEvent) + Send + Sync>;

/// Publish/subscribe channel for scan notifications
#[derive(Default)]
pub struct ScanEventBus {
    inner: Arc<Mutex<BusInner>>,
}

#[derive(Default)]
struct BusInner {
    next_id: u64,
    handlers: HashMap<ScanTopic, Vec<(u64, Handler)>>,
}

impl ScanEventBus {
    /// Create a new bus behind an `Arc`, the form every consumer shares.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register a handler for a topic.
    ///
    /// The returned token is the only handle to the registration; dropping
    /// it without calling `unsubscribe` leaves the handler installed.
    pub fn subscribe(
        &self,
        topic: ScanTopic,
        handler: impl Fn(&ScanEvent) + Send + Sync + 'static,
    ) -> SubscriptionToken {
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner
            .handlers
            .entry(topic)
            .or_default()
            .push((id, Arc::new(handler)));
        trace!(?topic, id, "subscribed scan handler");

        SubscriptionToken {
            bus: Arc::downgrade(&self.inner),
            topic,
            id,
            released: AtomicBool::new(false),
        }
    }

    /// Deliver an event to every handler subscribed to its topic.
    ///
    /// The handler list is cloned out of the lock before invocation so
    /// handlers may subscribe or unsubscribe re-entrantly.
    pub fn publish(&self, event: &ScanEvent) {
        let handlers: Vec<Handler> = {
            let inner = self.inner.lock();
            inner
                .handlers
                .get(&event.topic())
                .map(|list| list.iter().map(|(_, h)| Arc::clone(h)).collect())
                .unwrap_or_default()
        };

        for handler in handlers {
            handler(event);
        }
    }

    /// Number of live registrations for a topic
    pub fn subscriber_count(&self, topic: ScanTopic) -> usize {
        self.inner
            .lock()
            .handlers
            .get(&topic)
            .map_or(0, |list| list.len())
    }

    /// Drop every registration. Used when the owning session stops.
    pub fn clear(&self) {
        self.inner.lock().handlers.clear();
    }
}

/// Handle to a single bus registration
pub struct SubscriptionToken {
    bus: Weak<Mutex<BusInner>>,
    topic: ScanTopic,
    id: u64,
    released: AtomicBool,
}

impl SubscriptionToken {
    /// Remove the registration. Safe to call more than once; only the
    /// first call has any effect.
    pub fn unsubscribe(&self) {
        if self.released.swap(true, Ordering::SeqCst) {
            return;
        }
        let Some(bus) = self.bus.upgrade() else {
            return;
        };
        let mut inner = bus.lock();
        if let Some(list) = inner.handlers.get_mut(&self.topic) {
            if let Some(pos) = list.iter().position(|(entry_id, _)| *entry_id == self.id) {
                list.remove(pos);
                trace!(topic = ?self.topic, id = self.id, "unsubscribed scan handler");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn summary(generation: u64) -> ScanSummary {
        ScanSummary {
            generation,
            started_at: Utc::now(),
            tokens_scanned: 0,
            new_tokens: 0,
            duration_ms: 0,
        }
    }

    #[test]
    fn handlers_run_in_subscription_order() {
        let bus = ScanEventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let first = {
            let order = Arc::clone(&order);
            bus.subscribe(ScanTopic::ScanComplete, move |_| order.lock().push(1))
        };
        let second = {
            let order = Arc::clone(&order);
            bus.subscribe(ScanTopic::ScanComplete, move |_| order.lock().push(2))
        };

        bus.publish(&ScanEvent::ScanComplete(summary(0)));
        bus.publish(&ScanEvent::ScanComplete(summary(1)));

        assert_eq!(*order.lock(), vec![1, 2, 1, 2]);
        first.unsubscribe();
        second.unsubscribe();
    }

    #[test]
    fn unsubscribe_removes_exactly_one_registration() {
        let bus = ScanEventBus::new();
        let hits = Arc::new(Mutex::new(0u32));

        let token = {
            let hits = Arc::clone(&hits);
            bus.subscribe(ScanTopic::ScanComplete, move |_| *hits.lock() += 1)
        };
        let _kept = {
            let hits = Arc::clone(&hits);
            bus.subscribe(ScanTopic::ScanComplete, move |_| *hits.lock() += 1)
        };

        token.unsubscribe();
        // Repeat calls are no-ops.
        token.unsubscribe();

        bus.publish(&ScanEvent::ScanComplete(summary(0)));

        assert_eq!(*hits.lock(), 1);
        assert_eq!(bus.subscriber_count(ScanTopic::ScanComplete), 1);
    }

    #[test]
    fn topics_are_independent() {
        let bus = ScanEventBus::new();
        let hits = Arc::new(Mutex::new(0u32));

        let _token = {
            let hits = Arc::clone(&hits);
            bus.subscribe(ScanTopic::NewToken, move |_| *hits.lock() += 1)
        };

        bus.publish(&ScanEvent::ScanComplete(summary(0)));

        assert_eq!(*hits.lock(), 0);
    }

    #[test]
    fn clear_drops_all_registrations() {
        let bus = ScanEventBus::new();
        let _a = bus.subscribe(ScanTopic::ScanComplete, |_| {});
        let _b = bus.subscribe(ScanTopic::NewToken, |_| {});

        bus.clear();

        assert_eq!(bus.subscriber_count(ScanTopic::ScanComplete), 0);
        assert_eq!(bus.subscriber_count(ScanTopic::NewToken), 0);
    }
}
