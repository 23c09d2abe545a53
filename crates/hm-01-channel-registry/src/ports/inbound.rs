//! Inbound Ports (Driving Ports / API)
//!
//! What the lifecycle manager and the admin surface call.

use async_trait::async_trait;
use shared_types::entities::{Channel, ChannelId, Patch, UpdatedBy};

use crate::domain::{ChannelDraft, DeleteDecision, RegistryError};

/// Committed update: the stored state on either side of the write.
#[derive(Debug, Clone)]
pub struct ChannelChange {
    pub before: Channel,
    pub after: Channel,
}

/// Committed delete.
#[derive(Debug, Clone)]
pub struct DeleteOutcome {
    /// Stored state immediately before the delete.
    pub before: Channel,
    pub decision: DeleteDecision,
}

/// Channel Registry API
///
/// Every successful mutation has been validated, committed, audited and
/// made visible in the registry cache by the time it returns.
#[async_trait]
pub trait ChannelRegistryApi: Send + Sync {
    /// All channels, deleted ones included. Visibility filtering is the
    /// caller's concern.
    async fn list_channels(&self) -> Result<Vec<Channel>, RegistryError>;

    async fn get_channel(&self, id: ChannelId) -> Result<Channel, RegistryError>;

    async fn create_channel(
        &self,
        draft: ChannelDraft,
        actor: UpdatedBy,
    ) -> Result<Channel, RegistryError>;

    /// Partial update merged onto the stored channel.
    async fn update_channel(
        &self,
        id: ChannelId,
        draft: ChannelDraft,
        actor: UpdatedBy,
    ) -> Result<ChannelChange, RegistryError>;

    /// Hard or soft delete depending on referencing transactions.
    async fn delete_channel(
        &self,
        id: ChannelId,
        actor: UpdatedBy,
    ) -> Result<DeleteOutcome, RegistryError>;

    /// Patches for `id`, newest first. Unknown ids yield an empty list.
    async fn channel_audits(&self, id: ChannelId) -> Result<Vec<Patch>, RegistryError>;
}
