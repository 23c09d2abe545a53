//! # Shared Bus - Mediator Event Bus
//!
//! Carries the side effects the mediator core emits but does not process
//! itself: protocol-resource notifications for the TCP adapter and the
//! polling scheduler, manual triggers, completed-transaction records and
//! critical configuration alarms.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │  Lifecycle   │                    │ TCP adapter  │
//! │   Routing    │    publish()       │  Scheduler   │
//! │              │ ──────┐            │  Metrics     │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! Publishing never blocks on consumers; a bus with no subscribers simply
//! drops the event and reports zero receivers.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventTopic, MediatorEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{BusError, Subscription};

/// Events buffered per subscriber before the oldest are dropped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
