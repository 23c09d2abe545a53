//! Error types for the Channel Registry

use shared_types::entities::ChannelId;
use shared_types::errors::StoreError;
use thiserror::Error;

use super::validation::ValidationError;

/// All errors surfaced by registry operations
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Configuration rejected before commit; store untouched
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Another non-deleted channel already uses this name
    #[error("Channel name already in use: {name}")]
    Conflict { name: String },

    /// No such channel, or the channel is soft-deleted and read-only
    #[error("Channel not found: {0}")]
    NotFound(ChannelId),

    /// Persistence failure
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for RegistryError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}
