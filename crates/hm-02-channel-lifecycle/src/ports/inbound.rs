//! Inbound Ports (Driving Ports / API)

use async_trait::async_trait;
use hm_01_channel_registry::{ChannelChange, ChannelDraft, DeleteOutcome};
use shared_types::entities::{Channel, ChannelId, UpdatedBy};

use crate::domain::LifecycleError;
use crate::notify::{Committed, NotifyHandle};

/// Channel Lifecycle API
///
/// Mutations return once the registry commit is done. Notifications to the
/// TCP adapter and polling scheduler run afterwards and never affect the
/// returned result.
#[async_trait]
pub trait ChannelLifecycleApi: Send + Sync {
    async fn create(
        &self,
        draft: ChannelDraft,
        actor: UpdatedBy,
    ) -> Result<Committed<Channel>, LifecycleError>;

    async fn update(
        &self,
        id: ChannelId,
        draft: ChannelDraft,
        actor: UpdatedBy,
    ) -> Result<Committed<ChannelChange>, LifecycleError>;

    async fn delete(
        &self,
        id: ChannelId,
        actor: UpdatedBy,
    ) -> Result<Committed<DeleteOutcome>, LifecycleError>;

    /// Re-issue start/register for every active tcp and polling channel.
    async fn reconcile_all(&self) -> Result<NotifyHandle, LifecycleError>;
}
