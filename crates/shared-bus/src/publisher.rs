//! # Event Publisher
//!
//! Publishing is synchronous under the hood and never waits for consumers.

use crate::events::{EventFilter, MediatorEvent};
use crate::subscriber::{Subscribers, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, trace};

/// Sending side of the bus.
///
/// Lifecycle adapters and the routing service hold an
/// `Arc<dyn EventPublisher>` so tests can substitute their own.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Returns how many live subscriptions accept the event. Zero means
    /// nobody listens on its topic and the event is gone.
    async fn publish(&self, event: MediatorEvent) -> usize;

    /// Events accepted since the bus was created, delivered or not.
    fn events_published(&self) -> u64;
}

/// Process-local bus on `tokio::sync::broadcast`.
///
/// Collaborators living in another process bridge a subscription to their
/// own transport.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<MediatorEvent>,
    subscribers: Arc<Subscribers>,
    events_published: AtomicU64,
    events_unheard: AtomicU64,
    capacity: usize,
}

impl InMemoryEventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            subscribers: Arc::new(Subscribers::default()),
            events_published: AtomicU64::new(0),
            events_unheard: AtomicU64::new(0),
            capacity,
        }
    }

    /// Only events published after this call are delivered.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        let receiver = self.sender.subscribe();
        let subscription = Subscription::new(receiver, filter, self.subscribers.clone());
        debug!(
            topics = ?subscription.filter().topics,
            active = self.subscribers.len(),
            "Subscription opened"
        );
        subscription
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Events published while no subscription accepted them.
    #[must_use]
    pub fn events_unheard(&self) -> u64 {
        self.events_unheard.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: MediatorEvent) -> usize {
        let topic = event.topic();
        let source = event.source_subsystem();
        self.events_published.fetch_add(1, Ordering::Relaxed);

        let receivers = self.subscribers.matching(&event);
        if receivers == 0 {
            self.events_unheard.fetch_add(1, Ordering::Relaxed);
            trace!(?topic, source, "Event published with no listener");
            return 0;
        }

        // `send` only fails when there are no receivers.
        if self.sender.send(event).is_err() {
            self.events_unheard.fetch_add(1, Ordering::Relaxed);
            return 0;
        }
        trace!(?topic, source, receivers, "Event published");
        receivers
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}
