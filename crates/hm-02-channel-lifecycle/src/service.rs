//! Channel Lifecycle Service
//!
//! Two-phase mutation: commit through the registry, then notify external
//! collaborators in the background.

use async_trait::async_trait;
use hm_01_channel_registry::{
    ChannelChange, ChannelDraft, ChannelRegistryApi, DeleteOutcome, KeyedLocks,
};
use shared_types::entities::{Channel, ChannelId, UpdatedBy};
use std::sync::Arc;
use tracing::info;

use crate::config::LifecycleConfig;
use crate::delivery::DeliveryQueues;
use crate::domain::plan::{self, Notification};
use crate::domain::LifecycleError;
use crate::notify::{Committed, NotifyHandle};
use crate::ports::inbound::ChannelLifecycleApi;
use crate::ports::outbound::{PollingScheduler, TcpListenerAdapter};

/// Channel Lifecycle Service
///
/// Flow for every mutation:
/// 1. Validate and commit through the registry (audit and cache included)
/// 2. Plan notifications from the committed before/after states
/// 3. Queue delivery behind the channel's earlier plans; return without
///    waiting
///
/// Steps 1 and 3 run under a per-channel lock, so plans reach the
/// collaborators in commit order.
pub struct ChannelLifecycleService {
    registry: Arc<dyn ChannelRegistryApi>,
    mutations: KeyedLocks<ChannelId>,
    delivery: DeliveryQueues,
}

impl ChannelLifecycleService {
    pub fn new(
        registry: Arc<dyn ChannelRegistryApi>,
        tcp: Arc<dyn TcpListenerAdapter>,
        polling: Arc<dyn PollingScheduler>,
        config: LifecycleConfig,
    ) -> Result<Self, LifecycleError> {
        config.validate()?;
        Ok(Self {
            registry,
            mutations: KeyedLocks::new(),
            delivery: DeliveryQueues::new(tcp, polling, config.notify_timeout()),
        })
    }

    /// Channels whose notifications are still being delivered.
    #[must_use]
    pub fn deliveries_in_flight(&self) -> usize {
        self.delivery.len()
    }

    /// Queue `notifications` one batch per channel, keeping plan order
    /// within each channel.
    fn dispatch(&self, notifications: Vec<Notification>) -> NotifyHandle {
        if notifications.is_empty() {
            return NotifyHandle::none();
        }

        let mut batches: Vec<(ChannelId, Vec<Notification>)> = Vec::new();
        for notification in notifications {
            let id = notification.channel.id;
            match batches.iter_mut().find(|(batch_id, _)| *batch_id == id) {
                Some((_, batch)) => batch.push(notification),
                None => batches.push((id, vec![notification])),
            }
        }

        let planned = batches
            .iter()
            .flat_map(|(_, batch)| batch.iter().map(|n| n.action))
            .collect();
        let pending = batches
            .into_iter()
            .map(|(id, batch)| self.delivery.enqueue(id, batch))
            .collect();
        NotifyHandle::queued(planned, pending)
    }
}

#[async_trait]
impl ChannelLifecycleApi for ChannelLifecycleService {
    async fn create(
        &self,
        mut draft: ChannelDraft,
        actor: UpdatedBy,
    ) -> Result<Committed<Channel>, LifecycleError> {
        // Known before the commit so the lock covers it.
        let id = *draft.id.get_or_insert_with(ChannelId::new);
        let _guard = self.mutations.acquire(id).await;

        let channel = self.registry.create_channel(draft, actor).await?;
        let notifications = self.dispatch(plan::on_create(&channel));
        Ok(Committed {
            value: channel,
            notifications,
        })
    }

    async fn update(
        &self,
        id: ChannelId,
        draft: ChannelDraft,
        actor: UpdatedBy,
    ) -> Result<Committed<ChannelChange>, LifecycleError> {
        let _guard = self.mutations.acquire(id).await;
        let change = self.registry.update_channel(id, draft, actor).await?;
        let notifications = self.dispatch(plan::on_update(&change.before, &change.after));
        Ok(Committed {
            value: change,
            notifications,
        })
    }

    async fn delete(
        &self,
        id: ChannelId,
        actor: UpdatedBy,
    ) -> Result<Committed<DeleteOutcome>, LifecycleError> {
        let _guard = self.mutations.acquire(id).await;
        let outcome = self.registry.delete_channel(id, actor).await?;
        let notifications = self.dispatch(plan::on_delete(&outcome.before));
        Ok(Committed {
            value: outcome,
            notifications,
        })
    }

    async fn reconcile_all(&self) -> Result<NotifyHandle, LifecycleError> {
        let channels = self.registry.list_channels().await?;
        let notifications = plan::reconcile(&channels);
        info!(
            channels = channels.len(),
            notifications = notifications.len(),
            "Reconciling protocol collaborators"
        );
        Ok(self.dispatch(notifications))
    }
}
