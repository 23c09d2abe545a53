//! # Event Subscriber
//!
//! A filtered view over the bus. Collaborators that fall more than the bus
//! capacity behind lose the oldest events; the loss is counted, not fatal.

use crate::events::{EventFilter, MediatorEvent};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::{debug, warn};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    /// Every publisher handle is gone.
    #[error("Event bus closed")]
    Closed,
}

/// Filters of the live subscriptions, so the bus can tell how many of them
/// an event is meant for.
#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: AtomicU64,
    filters: RwLock<HashMap<u64, EventFilter>>,
}

impl Subscribers {
    fn register(&self, filter: EventFilter) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.filters.write().insert(id, filter);
        id
    }

    fn remove(&self, id: u64) {
        self.filters.write().remove(&id);
    }

    /// Live subscriptions whose filter accepts `event`.
    pub(crate) fn matching(&self, event: &MediatorEvent) -> usize {
        self.filters
            .read()
            .values()
            .filter(|filter| filter.matches(event))
            .count()
    }

    pub(crate) fn len(&self) -> usize {
        self.filters.read().len()
    }
}

/// Receiving end held by one collaborator.
///
/// Dropping it removes the subscription from the bus's live set.
pub struct Subscription {
    receiver: broadcast::Receiver<MediatorEvent>,
    filter: EventFilter,
    subscribers: Arc<Subscribers>,
    id: u64,
    missed: u64,
}

impl Subscription {
    pub(crate) fn new(
        receiver: broadcast::Receiver<MediatorEvent>,
        filter: EventFilter,
        subscribers: Arc<Subscribers>,
    ) -> Self {
        let id = subscribers.register(filter.clone());
        Self {
            receiver,
            filter,
            subscribers,
            id,
            missed: 0,
        }
    }

    fn note_lag(&mut self, count: u64) {
        self.missed += count;
        warn!(
            lagged = count,
            total_missed = self.missed,
            topics = ?self.filter.topics,
            "Subscriber fell behind; oldest events dropped"
        );
    }

    /// Next event accepted by the filter. `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<MediatorEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) => {}
                Err(RecvError::Lagged(count)) => self.note_lag(count),
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking variant of [`recv`](Self::recv).
    ///
    /// `Ok(None)` means nothing is queued right now.
    pub fn try_recv(&mut self) -> Result<Option<MediatorEvent>, BusError> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.filter.matches(&event) => return Ok(Some(event)),
                Ok(_) => {}
                Err(TryRecvError::Lagged(count)) => self.note_lag(count),
                Err(TryRecvError::Empty) => return Ok(None),
                Err(TryRecvError::Closed) => return Err(BusError::Closed),
            }
        }
    }

    /// Everything matching that is queued right now, oldest first.
    pub fn drain(&mut self) -> Vec<MediatorEvent> {
        std::iter::from_fn(|| self.try_recv().ok().flatten()).collect()
    }

    /// Events lost to lag since this subscription was created.
    #[must_use]
    pub fn missed(&self) -> u64 {
        self.missed
    }

    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.subscribers.remove(self.id);
        debug!(topics = ?self.filter.topics, missed = self.missed, "Subscription dropped");
    }
}
