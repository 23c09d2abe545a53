//! Outbound Ports (Driven Ports / SPI)
//!
//! Persistence seams for the registry. The in-memory adapters in
//! `crate::adapters` implement all three; a database-backed deployment
//! would supply its own.

use async_trait::async_trait;
use shared_types::entities::{Channel, ChannelId, Patch};
use shared_types::errors::StoreError;

/// Durable channel collection.
///
/// Implementations enforce name uniqueness among non-deleted channels on
/// `insert` and `replace`, returning `StoreError::Duplicate`.
#[async_trait]
pub trait ChannelStore: Send + Sync {
    /// All channels, deleted ones included.
    async fn list(&self) -> Result<Vec<Channel>, StoreError>;

    async fn get(&self, id: ChannelId) -> Result<Option<Channel>, StoreError>;

    /// The non-deleted channel called `name`, if any.
    async fn find_by_name(&self, name: &str) -> Result<Option<Channel>, StoreError>;

    async fn insert(&self, channel: Channel) -> Result<(), StoreError>;

    /// Overwrite an existing channel. `NotFound` if it is gone.
    async fn replace(&self, channel: Channel) -> Result<(), StoreError>;

    /// Hard removal. `NotFound` if it is gone.
    async fn remove(&self, id: ChannelId) -> Result<(), StoreError>;
}

/// Append-only audit log.
#[async_trait]
pub trait PatchStore: Send + Sync {
    async fn append(&self, patch: Patch) -> Result<(), StoreError>;

    /// Patches for `channel_id` in insertion order.
    async fn for_channel(&self, channel_id: ChannelId) -> Result<Vec<Patch>, StoreError>;
}

/// Read-only view of the transaction store.
#[async_trait]
pub trait TransactionCounter: Send + Sync {
    /// Number of transactions referencing `channel_id`.
    async fn count_for_channel(&self, channel_id: ChannelId) -> Result<u64, StoreError>;
}
