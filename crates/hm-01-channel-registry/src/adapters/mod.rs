//! Adapters for the Channel Registry outbound ports

pub mod memory;

pub use memory::{InMemoryChannelStore, InMemoryPatchStore, InMemoryTransactionCounter};
