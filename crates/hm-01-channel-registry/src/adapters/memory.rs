//! In-memory persistence adapters
//!
//! Backed by `parking_lot` locks; no await point is ever held under a lock.

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::entities::{Channel, ChannelId, Patch};
use shared_types::errors::StoreError;
use std::collections::HashMap;

use crate::ports::outbound::{ChannelStore, PatchStore, TransactionCounter};

/// Channel collection keyed by id.
#[derive(Default)]
pub struct InMemoryChannelStore {
    channels: RwLock<HashMap<ChannelId, Channel>>,
}

impl InMemoryChannelStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn name_taken(map: &HashMap<ChannelId, Channel>, channel: &Channel) -> bool {
        map.values()
            .any(|c| c.id != channel.id && !c.is_deleted() && c.name == channel.name)
    }
}

#[async_trait]
impl ChannelStore for InMemoryChannelStore {
    async fn list(&self) -> Result<Vec<Channel>, StoreError> {
        let mut all: Vec<Channel> = self.channels.read().values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn get(&self, id: ChannelId) -> Result<Option<Channel>, StoreError> {
        Ok(self.channels.read().get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Channel>, StoreError> {
        Ok(self
            .channels
            .read()
            .values()
            .find(|c| !c.is_deleted() && c.name == name)
            .cloned())
    }

    async fn insert(&self, channel: Channel) -> Result<(), StoreError> {
        let mut map = self.channels.write();
        if map.contains_key(&channel.id) {
            return Err(StoreError::Duplicate(format!("id={}", channel.id)));
        }
        if !channel.is_deleted() && Self::name_taken(&map, &channel) {
            return Err(StoreError::Duplicate(format!("name={}", channel.name)));
        }
        map.insert(channel.id, channel);
        Ok(())
    }

    async fn replace(&self, channel: Channel) -> Result<(), StoreError> {
        let mut map = self.channels.write();
        if !map.contains_key(&channel.id) {
            return Err(StoreError::NotFound(channel.id.to_string()));
        }
        if !channel.is_deleted() && Self::name_taken(&map, &channel) {
            return Err(StoreError::Duplicate(format!("name={}", channel.name)));
        }
        map.insert(channel.id, channel);
        Ok(())
    }

    async fn remove(&self, id: ChannelId) -> Result<(), StoreError> {
        self.channels
            .write()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

/// Append-only patch log.
#[derive(Default)]
pub struct InMemoryPatchStore {
    patches: RwLock<Vec<Patch>>,
}

impl InMemoryPatchStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.patches.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PatchStore for InMemoryPatchStore {
    async fn append(&self, patch: Patch) -> Result<(), StoreError> {
        self.patches.write().push(patch);
        Ok(())
    }

    async fn for_channel(&self, channel_id: ChannelId) -> Result<Vec<Patch>, StoreError> {
        Ok(self
            .patches
            .read()
            .iter()
            .filter(|p| p.channel_id == channel_id)
            .cloned()
            .collect())
    }
}

/// Stand-in for the transaction store: per-channel reference counts.
#[derive(Default)]
pub struct InMemoryTransactionCounter {
    counts: RwLock<HashMap<ChannelId, u64>>,
}

impl InMemoryTransactionCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one transaction against `channel_id`.
    pub fn record(&self, channel_id: ChannelId) {
        *self.counts.write().entry(channel_id).or_insert(0) += 1;
    }
}

#[async_trait]
impl TransactionCounter for InMemoryTransactionCounter {
    async fn count_for_channel(&self, channel_id: ChannelId) -> Result<u64, StoreError> {
        Ok(self.counts.read().get(&channel_id).copied().unwrap_or(0))
    }
}
