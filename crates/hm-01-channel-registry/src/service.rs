//! Channel Registry Service
//!
//! Main service implementing `ChannelRegistryApi`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared_types::entities::{Channel, ChannelId, ChannelStatus, Patch, PatchOp, UpdatedBy};
use shared_types::errors::StoreError;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::cache::RegistryCache;
use crate::config::RegistryConfig;
use crate::domain::diff::{channel_diff, removal};
use crate::domain::{ChannelDraft, DeleteDecision, MutationStamp, RegistryError};
use crate::locks::KeyedLocks;
use crate::ports::inbound::{ChannelChange, ChannelRegistryApi, DeleteOutcome};
use crate::ports::outbound::{ChannelStore, PatchStore, TransactionCounter};

/// Channel Registry Service
///
/// Mutations on the same channel id are serialized by a per-id async lock;
/// different channels proceed in parallel. Each mutation runs:
/// 1. Resolve and validate the draft
/// 2. Check name uniqueness
/// 3. Commit to the channel store
/// 4. Append one audit patch
/// 5. Refresh the registry cache
pub struct ChannelRegistryService {
    channels: Arc<dyn ChannelStore>,
    patches: Arc<dyn PatchStore>,
    transactions: Arc<dyn TransactionCounter>,
    cache: Arc<RegistryCache>,
    locks: KeyedLocks<ChannelId>,
}

impl ChannelRegistryService {
    pub fn new(
        channels: Arc<dyn ChannelStore>,
        patches: Arc<dyn PatchStore>,
        transactions: Arc<dyn TransactionCounter>,
        config: &RegistryConfig,
    ) -> Self {
        let cache = Arc::new(RegistryCache::new(channels.clone(), config.cache_ttl()));
        Self {
            channels,
            patches,
            transactions,
            cache,
            locks: KeyedLocks::new(),
        }
    }

    /// Shared handle to the registry cache.
    #[must_use]
    pub fn cache(&self) -> Arc<RegistryCache> {
        self.cache.clone()
    }

    /// Channel ids with a mutation currently in flight.
    #[must_use]
    pub fn locks_in_use(&self) -> usize {
        self.locks.len()
    }

    async fn load(&self, id: ChannelId) -> Result<Channel, RegistryError> {
        self.channels
            .get(id)
            .await?
            .ok_or(RegistryError::NotFound(id))
    }

    async fn ensure_name_free(&self, channel: &Channel) -> Result<(), RegistryError> {
        match self.channels.find_by_name(&channel.name).await? {
            Some(existing) if existing.id != channel.id => Err(RegistryError::Conflict {
                name: channel.name.clone(),
            }),
            _ => Ok(()),
        }
    }

    /// Store-level uniqueness is the final word when two creates race.
    fn commit_error(err: StoreError, channel: &Channel) -> RegistryError {
        match err {
            StoreError::Duplicate(_) => RegistryError::Conflict {
                name: channel.name.clone(),
            },
            StoreError::NotFound(_) => RegistryError::NotFound(channel.id),
            other => RegistryError::Store(other),
        }
    }

    /// The commit is authoritative; a failed append is logged, not undone.
    async fn audit(&self, id: ChannelId, ops: Vec<PatchOp>, actor: &UpdatedBy, at: DateTime<Utc>) {
        let patch = Patch {
            id: Uuid::new_v4(),
            channel_id: id,
            ops,
            date: at,
            updated_by: Some(actor.clone()),
        };
        let op_count = patch.ops.len();
        if let Err(e) = self.patches.append(patch).await {
            error!(channel_id = %id, error = %e, "Failed to append audit patch");
        } else {
            debug!(channel_id = %id, op_count, "Audit patch appended");
        }
    }

    async fn refresh_cache(&self) {
        if let Err(e) = self.cache.refresh().await {
            warn!(error = %e, "Registry cache refresh failed; left invalidated");
        }
    }
}

#[async_trait]
impl ChannelRegistryApi for ChannelRegistryService {
    async fn list_channels(&self) -> Result<Vec<Channel>, RegistryError> {
        Ok(self.channels.list().await?)
    }

    async fn get_channel(&self, id: ChannelId) -> Result<Channel, RegistryError> {
        self.load(id).await
    }

    async fn create_channel(
        &self,
        draft: ChannelDraft,
        actor: UpdatedBy,
    ) -> Result<Channel, RegistryError> {
        let stamp = MutationStamp::now(actor);
        let channel = draft.resolve(None, &stamp)?;

        let _guard = self.locks.acquire(channel.id).await;

        self.ensure_name_free(&channel).await?;
        self.channels
            .insert(channel.clone())
            .await
            .map_err(|e| Self::commit_error(e, &channel))?;

        self.audit(channel.id, channel_diff(None, &channel), &stamp.actor, stamp.at)
            .await;
        self.refresh_cache().await;

        info!(
            channel_id = %channel.id,
            name = %channel.name,
            channel_type = %channel.channel_type,
            "Channel created"
        );
        Ok(channel)
    }

    async fn update_channel(
        &self,
        id: ChannelId,
        draft: ChannelDraft,
        actor: UpdatedBy,
    ) -> Result<ChannelChange, RegistryError> {
        let _guard = self.locks.acquire(id).await;

        let before = self.load(id).await?;
        if before.is_deleted() {
            return Err(RegistryError::NotFound(id));
        }

        let stamp = MutationStamp::now(actor);
        let after = draft.resolve(Some(&before), &stamp)?;

        self.ensure_name_free(&after).await?;
        self.channels
            .replace(after.clone())
            .await
            .map_err(|e| Self::commit_error(e, &after))?;

        self.audit(id, channel_diff(Some(&before), &after), &stamp.actor, stamp.at)
            .await;
        self.refresh_cache().await;

        info!(channel_id = %id, name = %after.name, "Channel updated");
        Ok(ChannelChange { before, after })
    }

    async fn delete_channel(
        &self,
        id: ChannelId,
        actor: UpdatedBy,
    ) -> Result<DeleteOutcome, RegistryError> {
        let _guard = self.locks.acquire(id).await;

        let before = self.load(id).await?;
        let linked = self.transactions.count_for_channel(id).await?;
        let decision = DeleteDecision::for_linked_transactions(linked);
        let stamp = MutationStamp::now(actor);

        let ops = match decision {
            DeleteDecision::HardDelete => {
                self.channels.remove(id).await?;
                removal()
            }
            DeleteDecision::SoftDelete { .. } => {
                let mut after = before.clone();
                after.status = ChannelStatus::Deleted;
                after.updated_by = Some(stamp.actor.clone());
                after.updated_at = stamp.at;
                self.channels
                    .replace(after.clone())
                    .await
                    .map_err(|e| Self::commit_error(e, &after))?;
                channel_diff(Some(&before), &after)
            }
        };

        self.audit(id, ops, &stamp.actor, stamp.at).await;
        self.refresh_cache().await;

        info!(channel_id = %id, name = %before.name, ?decision, "Channel deleted");
        Ok(DeleteOutcome { before, decision })
    }

    async fn channel_audits(&self, id: ChannelId) -> Result<Vec<Patch>, RegistryError> {
        let mut patches = self.patches.for_channel(id).await?;
        // Later appends win ties on equal timestamps.
        patches.reverse();
        patches.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(patches)
    }
}
