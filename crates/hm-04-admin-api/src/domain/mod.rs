//! Domain layer for the admin surface.

pub mod config;
pub mod error;

pub use config::{ApiConfig, AuthConfig, ConfigError, StaticUser};
pub use error::{AdminApiError, ApiResult};
