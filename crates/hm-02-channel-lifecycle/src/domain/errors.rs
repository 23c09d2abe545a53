//! Error types for Channel Lifecycle

use hm_01_channel_registry::RegistryError;
use shared_types::entities::ChannelId;
use thiserror::Error;

use super::plan::LifecycleAction;

/// Errors returned to callers of the lifecycle service
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Mutation rejected or failed before commit
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Invalid lifecycle configuration
    #[error("Invalid lifecycle config: {0}")]
    InvalidConfig(String),
}

/// Failure reported by a TCP adapter or polling scheduler
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AdapterError {
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),

    #[error("collaborator rejected request: {0}")]
    Rejected(String),

    #[error("no answer within {0:?}")]
    TimedOut(std::time::Duration),
}

/// A notification that could not be delivered. Logged, never rolled back.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{action} for channel {channel_id} failed: {source}")]
pub struct NotifyError {
    pub action: LifecycleAction,
    pub channel_id: ChannelId,
    #[source]
    pub source: AdapterError,
}
