//! Domain module for the Channel Registry
//!
//! Drafts, validation, diffing and delete semantics. No I/O.

pub mod diff;
pub mod draft;
pub mod errors;
pub mod soft_delete;
pub mod validation;

pub use draft::{ChannelDraft, MutationStamp, RouteDraft};
pub use errors::RegistryError;
pub use soft_delete::DeleteDecision;
pub use validation::{ValidationError, ValidationIssue};
