//! Error types for Channel Routing

use hm_01_channel_registry::RegistryError;
use shared_types::entities::ChannelId;
use thiserror::Error;

/// Routing boundary outcomes
#[derive(Debug, Error)]
pub enum RoutingError {
    /// No enabled channel claims this transaction
    #[error("No channel matches {path}")]
    NotFound { path: String },

    /// The winning channel refused the caller. Deliberately says nothing
    /// about whether the caller was unknown or merely not allowed.
    #[error("Unauthorized")]
    Unauthorized,

    /// Administrative caller may not act on this channel
    #[error("Forbidden")]
    Forbidden,

    /// The winning channel has no usable primary route
    #[error("Fatal configuration on channel {channel_id}: {reason}")]
    FatalConfig { channel_id: ChannelId, reason: String },

    /// Registry lookup failed on the manual path
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
