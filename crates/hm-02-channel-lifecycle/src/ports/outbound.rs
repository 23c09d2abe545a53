//! Outbound Ports (Driven Ports / SPI)
//!
//! External protocol collaborators. Both are expected to treat repeated
//! calls for the same channel as no-ops.

use async_trait::async_trait;
use shared_types::entities::Channel;

use crate::domain::AdapterError;

/// Manages per-channel TCP listeners.
#[async_trait]
pub trait TcpListenerAdapter: Send + Sync {
    async fn start_listener(&self, channel: &Channel) -> Result<(), AdapterError>;

    async fn stop_listener(&self, channel: &Channel) -> Result<(), AdapterError>;
}

/// Manages polling schedules.
#[async_trait]
pub trait PollingScheduler: Send + Sync {
    /// Register with name, urlPattern, type and schedule taken from `channel`.
    async fn register(&self, channel: &Channel) -> Result<(), AdapterError>;

    async fn deregister(&self, channel: &Channel) -> Result<(), AdapterError>;
}
