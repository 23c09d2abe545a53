//! Background task wiring.

pub mod cache_refresh;

pub use cache_refresh::spawn_cache_refresh;
