//! # Subsystem Container
//!
//! Central container holding every subsystem instance, built once from a
//! validated `MediatorConfig`.

pub mod config;
pub mod subsystems;

pub use config::{ConfigError, MediatorConfig};
pub use subsystems::MediatorContainer;
