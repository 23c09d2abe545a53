//! Request middleware for the admin surface.

pub mod auth;

pub use auth::{authenticate, bearer_token};
