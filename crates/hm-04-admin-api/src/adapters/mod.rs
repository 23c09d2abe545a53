//! Adapters for the admin surface.

pub mod static_tokens;

pub use static_tokens::StaticTokenResolver;
