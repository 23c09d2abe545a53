//! Domain module for Channel Routing
//!
//! Matching, ordering, authorization and route selection. All pure; the
//! service wires them to the registry cache.

pub mod authorization;
pub mod errors;
pub mod matcher;
pub mod priority;
pub mod route_selector;

pub use errors::RoutingError;
