//! # HM-03: Channel Routing Subsystem
//!
//! Decides, for every inbound transaction, which channel owns it, whether
//! the caller may use it, and which route receives it.
//!
//! ## Routing path
//!
//! ```text
//! transaction ─► Matcher ─► candidates ─► priority ─► winner
//!             ─► authorize (no fallback) ─► primary route
//! ```
//!
//! The path reads one registry snapshot. Storage is touched only when that
//! snapshot is stale, and then once for all readers waiting on it, so any
//! number of transactions route concurrently.

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::authorization::{can_mutate, can_trigger, can_view};
pub use domain::matcher::{CandidateFilter, Matcher};
pub use domain::RoutingError;
pub use ports::{ChannelRoutingApi, RoutingDecision};
pub use service::ChannelRoutingService;
