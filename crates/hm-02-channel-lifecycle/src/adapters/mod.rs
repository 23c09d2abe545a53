//! Adapters for the lifecycle outbound ports

pub mod bus;

pub use bus::{BusPollingScheduler, BusTcpAdapter};
