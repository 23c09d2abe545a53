//! Configuration for Channel Lifecycle

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::LifecycleError;

/// Lifecycle configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Upper bound on a single adapter/scheduler call (milliseconds)
    pub notify_timeout_ms: u64,
}

impl LifecycleConfig {
    #[must_use]
    pub fn notify_timeout(&self) -> Duration {
        Duration::from_millis(self.notify_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), LifecycleError> {
        if self.notify_timeout_ms == 0 {
            return Err(LifecycleError::InvalidConfig(
                "notify_timeout_ms must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            notify_timeout_ms: 5_000,
        }
    }
}
