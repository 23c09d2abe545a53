//! # Mediator Events
//!
//! Defines all event types that flow through the shared bus.

use serde::{Deserialize, Serialize};
use shared_types::entities::{Channel, ChannelId};
use shared_types::transaction::DispatchRecord;

/// Subsystem identifiers used as event sources.
pub mod subsystem {
    pub const CHANNEL_REGISTRY: u8 = 1;
    pub const CHANNEL_LIFECYCLE: u8 = 2;
    pub const CHANNEL_ROUTING: u8 = 3;
    pub const ADMIN_API: u8 = 4;
}

/// All events that can be published to the event bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MediatorEvent {
    // =========================================================================
    // SUBSYSTEM 2: CHANNEL LIFECYCLE
    // =========================================================================
    /// A tcp channel became active; the adapter should bind its listener.
    /// Source: Subsystem 2 | Target: TCP adapter
    StartTcpListener(Box<Channel>),

    /// A tcp channel stopped being active.
    /// Source: Subsystem 2 | Target: TCP adapter
    StopTcpListener(Box<Channel>),

    /// A polling channel became active.
    /// Source: Subsystem 2 | Target: Polling scheduler
    RegisterPolling(Box<Channel>),

    /// A polling channel stopped being active or was deleted.
    /// Source: Subsystem 2 | Target: Polling scheduler
    DeregisterPolling(Box<Channel>),

    // =========================================================================
    // SUBSYSTEM 3: CHANNEL ROUTING
    // =========================================================================
    /// A channel was manually triggered and should be dispatched to `route`.
    ChannelTriggered {
        channel_id: ChannelId,
        channel_name: String,
        route: String,
    },

    /// A dispatch finished. Consumed by metrics and body-culling collaborators.
    TransactionCompleted(DispatchRecord),

    // =========================================================================
    // CRITICAL EVENTS
    // =========================================================================
    /// Critical error requiring operator attention.
    CriticalError {
        /// The subsystem that encountered the error.
        subsystem_id: u8,
        /// Error description.
        error: String,
    },
}

impl MediatorEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::StartTcpListener(_) | Self::StopTcpListener(_) => EventTopic::TcpAdapter,
            Self::RegisterPolling(_) | Self::DeregisterPolling(_) => EventTopic::PollingScheduler,
            Self::ChannelTriggered { .. } => EventTopic::Dispatch,
            Self::TransactionCompleted(_) => EventTopic::CompletedTransactions,
            Self::CriticalError { .. } => EventTopic::Critical,
        }
    }

    /// Get the originating subsystem ID.
    #[must_use]
    pub fn source_subsystem(&self) -> u8 {
        match self {
            Self::StartTcpListener(_)
            | Self::StopTcpListener(_)
            | Self::RegisterPolling(_)
            | Self::DeregisterPolling(_) => subsystem::CHANNEL_LIFECYCLE,
            Self::ChannelTriggered { .. } | Self::TransactionCompleted(_) => {
                subsystem::CHANNEL_ROUTING
            }
            Self::CriticalError { subsystem_id, .. } => *subsystem_id,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Listener start/stop requests.
    TcpAdapter,
    /// Schedule register/deregister requests.
    PollingScheduler,
    /// Manual dispatch requests.
    Dispatch,
    /// Completed-transaction records.
    CompletedTransactions,
    /// Fatal configuration alarms.
    Critical,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Source subsystems to include. Empty means all sources.
    pub source_subsystems: Vec<u8>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            source_subsystems: Vec::new(),
        }
    }

    /// Create a filter for events from specific subsystems.
    #[must_use]
    pub fn from_subsystems(subsystems: Vec<u8>) -> Self {
        Self {
            topics: Vec::new(),
            source_subsystems: subsystems,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &MediatorEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let source_match = self.source_subsystems.is_empty()
            || self.source_subsystems.contains(&event.source_subsystem());

        topic_match && source_match
    }
}
