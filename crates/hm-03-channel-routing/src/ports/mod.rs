//! Ports module for Channel Routing
//!
//! Outbound effects go through `shared_bus::EventPublisher`.

pub mod inbound;

pub use inbound::{ChannelRoutingApi, RoutingDecision};
