//! # Integration Scenarios
//!
//! Every scenario runs against a fully wired mediator: registry, lifecycle
//! manager, routing engine and admin router over one in-memory bus.

#[cfg(test)]
pub mod harness;

pub mod admin_scenarios;
pub mod lifecycle_scenarios;
pub mod routing_scenarios;
pub mod validation_scenarios;
