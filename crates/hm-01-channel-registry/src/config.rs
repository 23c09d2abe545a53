//! Configuration for the Channel Registry

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Registry configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Age after which the cache snapshot counts as stale (seconds)
    pub cache_ttl_secs: u64,
    /// Period of the background refresh task (seconds)
    pub refresh_interval_secs: u64,
}

impl RegistryConfig {
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 60,
            refresh_interval_secs: 15,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegistryConfig::default();
        assert_eq!(config.cache_ttl(), Duration::from_secs(60));
        assert_eq!(config.refresh_interval(), Duration::from_secs(15));
    }
}
