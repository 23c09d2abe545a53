//! Ports module for the Channel Registry
//!
//! Defines inbound (API) and outbound (SPI) port traits.

pub mod inbound;
pub mod outbound;

pub use inbound::{ChannelChange, ChannelRegistryApi, DeleteOutcome};
pub use outbound::{ChannelStore, PatchStore, TransactionCounter};
