//! Ports for the admin surface.

pub mod outbound;

pub use outbound::IdentityResolver;
