//! # Mediator Configuration
//!
//! Unified configuration for every subsystem.
//!
//! Sources, later wins:
//! 1. Built-in defaults
//! 2. TOML file named by `HM_CONFIG`
//! 3. `HM_API_HOST`, `HM_API_PORT`, `HM_CACHE_TTL_SECS`,
//!    `HM_REFRESH_INTERVAL_SECS`

use hm_01_channel_registry::RegistryConfig;
use hm_02_channel_lifecycle::LifecycleConfig;
use hm_04_admin_api::{ApiConfig, AuthConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Complete mediator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MediatorConfig {
    /// Admin API server.
    pub api: ApiConfig,
    /// Registry cache.
    pub registry: RegistryConfig,
    /// Lifecycle notifications.
    pub lifecycle: LifecycleConfig,
    /// Admin caller resolution.
    pub auth: AuthConfig,
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("environment variable {var} has invalid value '{value}'")]
    Env { var: String, value: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl MediatorConfig {
    /// Load from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load with an arbitrary variable source.
    pub fn load_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup("HM_CONFIG") {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        config.apply_env(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    fn apply_env<F>(&mut self, lookup: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("HM_API_HOST") {
            self.api.host = parse_var("HM_API_HOST", &v)?;
        }
        if let Some(v) = lookup("HM_API_PORT") {
            self.api.port = parse_var("HM_API_PORT", &v)?;
        }
        if let Some(v) = lookup("HM_CACHE_TTL_SECS") {
            self.registry.cache_ttl_secs = parse_var("HM_CACHE_TTL_SECS", &v)?;
        }
        if let Some(v) = lookup("HM_REFRESH_INTERVAL_SECS") {
            self.registry.refresh_interval_secs = parse_var("HM_REFRESH_INTERVAL_SECS", &v)?;
        }
        Ok(())
    }

    /// Reject configurations the runtime cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.registry.cache_ttl_secs == 0 {
            return Err(ConfigError::Invalid("registry.cache_ttl_secs cannot be 0".into()));
        }
        if self.registry.refresh_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "registry.refresh_interval_secs cannot be 0".into(),
            ));
        }
        self.api
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.auth
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.lifecycle
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(())
    }
}

fn parse_var<T: FromStr>(var: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Env {
        var: var.to_string(),
        value: value.to_string(),
    })
}
