//! Channel Routing Service
//!
//! Main service implementing `ChannelRoutingApi`.

use async_trait::async_trait;
use hm_01_channel_registry::{ChannelRegistryApi, RegistryCache, RegistryError};
use shared_bus::events::subsystem;
use shared_bus::{EventPublisher, MediatorEvent};
use shared_types::entities::{Channel, ChannelId};
use shared_types::identity::{AdminCaller, ClientIdentity};
use shared_types::transaction::{DispatchRecord, TransactionDescriptor};
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::authorization::{authorize, can_trigger};
use crate::domain::matcher::Matcher;
use crate::domain::priority::resolve;
use crate::domain::route_selector::select_primary;
use crate::domain::RoutingError;
use crate::ports::inbound::{ChannelRoutingApi, RoutingDecision};

/// Channel Routing Service
///
/// Routing path, per transaction:
/// 1. Take the current registry snapshot
/// 2. Match candidates
/// 3. Resolve a single winner by priority
/// 4. Authorize the caller against that winner only
/// 5. Select its primary route
pub struct ChannelRoutingService {
    cache: Arc<RegistryCache>,
    registry: Arc<dyn ChannelRegistryApi>,
    bus: Arc<dyn EventPublisher>,
    matcher: Matcher,
}

impl ChannelRoutingService {
    pub fn new(
        cache: Arc<RegistryCache>,
        registry: Arc<dyn ChannelRegistryApi>,
        bus: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            cache,
            registry,
            bus,
            matcher: Matcher::new(),
        }
    }

    /// Replace the matcher, e.g. to add candidate filters.
    #[must_use]
    pub fn with_matcher(mut self, matcher: Matcher) -> Self {
        self.matcher = matcher;
        self
    }

    async fn primary_decision(&self, channel: &Channel) -> Result<RoutingDecision, RoutingError> {
        match select_primary(channel) {
            Ok(route) => Ok(RoutingDecision {
                channel_id: channel.id,
                channel_name: channel.name.clone(),
                route: route.clone(),
            }),
            Err(err) => {
                self.bus
                    .publish(MediatorEvent::CriticalError {
                        subsystem_id: subsystem::CHANNEL_ROUTING,
                        error: err.to_string(),
                    })
                    .await;
                Err(err)
            }
        }
    }
}

#[async_trait]
impl ChannelRoutingApi for ChannelRoutingService {
    async fn route(
        &self,
        tx: &TransactionDescriptor,
        caller: Option<&ClientIdentity>,
    ) -> Result<RoutingDecision, RoutingError> {
        let snapshot = self.cache.current().await;
        let candidates = self.matcher.candidates(&snapshot, tx);
        debug!(
            path = %tx.path,
            candidates = candidates.len(),
            manual = tx.manual_trigger,
            "Matched candidates"
        );

        let winner = resolve(&candidates).ok_or_else(|| RoutingError::NotFound {
            path: tx.path.clone(),
        })?;

        authorize(winner, caller)?;
        self.primary_decision(winner).await
    }

    async fn trigger(
        &self,
        channel_id: ChannelId,
        caller: &AdminCaller,
    ) -> Result<RoutingDecision, RoutingError> {
        let channel = match self.registry.get_channel(channel_id).await {
            Ok(channel) if !channel.is_deleted() => channel,
            Ok(_) | Err(RegistryError::NotFound(_)) => {
                return Err(RoutingError::NotFound {
                    path: format!("/channels/{channel_id}"),
                })
            }
            Err(e) => return Err(e.into()),
        };

        if !can_trigger(caller, &channel) {
            return Err(RoutingError::Forbidden);
        }

        let decision = self.primary_decision(&channel).await?;
        self.bus
            .publish(MediatorEvent::ChannelTriggered {
                channel_id,
                channel_name: channel.name.clone(),
                route: decision.route.name.clone(),
            })
            .await;

        info!(
            channel_id = %channel_id,
            route = %decision.route.name,
            caller = %caller.id,
            "Channel manually triggered"
        );
        Ok(decision)
    }

    async fn record_completion(&self, record: DispatchRecord) {
        debug!(
            channel_id = %record.channel_id,
            status = ?record.status,
            response_time_ms = record.response_time_ms(),
            "Transaction completed"
        );
        self.bus
            .publish(MediatorEvent::TransactionCompleted(record))
            .await;
    }
}
