//! Outbound Ports (Driven Ports / SPI)

use async_trait::async_trait;
use shared_types::identity::AdminCaller;

/// Maps request credentials to an administrative caller.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// `None` when the token belongs to nobody.
    async fn resolve(&self, token: &str) -> Option<AdminCaller>;
}
