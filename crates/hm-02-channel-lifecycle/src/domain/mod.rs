//! Domain module for Channel Lifecycle
//!
//! Reconciliation planning and error types.

pub mod errors;
pub mod plan;

pub use errors::{AdapterError, LifecycleError, NotifyError};
pub use plan::{LifecycleAction, Notification};
