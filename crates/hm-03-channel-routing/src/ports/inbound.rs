//! Inbound Ports (Driving Ports / API)

use async_trait::async_trait;
use serde::Serialize;
use shared_types::entities::{ChannelId, Route};
use shared_types::identity::{AdminCaller, ClientIdentity};
use shared_types::transaction::{DispatchRecord, TransactionDescriptor};

use crate::domain::RoutingError;

/// Where a transaction goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingDecision {
    pub channel_id: ChannelId,
    pub channel_name: String,
    pub route: Route,
}

/// Channel Routing API
#[async_trait]
pub trait ChannelRoutingApi: Send + Sync {
    /// Match, resolve, authorize and select for one inbound transaction.
    /// Reads the registry cache, rebuilding it first when stale.
    async fn route(
        &self,
        tx: &TransactionDescriptor,
        caller: Option<&ClientIdentity>,
    ) -> Result<RoutingDecision, RoutingError>;

    /// Administrative manual trigger of a channel by id.
    async fn trigger(
        &self,
        channel_id: ChannelId,
        caller: &AdminCaller,
    ) -> Result<RoutingDecision, RoutingError>;

    /// Hand a finished dispatch to metrics and culling collaborators.
    async fn record_completion(&self, record: DispatchRecord);
}
