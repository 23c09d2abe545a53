//! # Shared Types Crate
//!
//! This crate contains the domain entities shared by every mediator
//! subsystem: channels and their routes, audit patches, caller identities
//! and inbound transaction descriptors.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Wire Compatibility**: JSON field names are camelCase (`urlPattern`,
//!   `txViewAcl`, `pathTransform`) so stored channels and API payloads share
//!   one representation.
//! - **Typed Membership**: Allow-lists and groups are `RoleSet`s, never raw
//!   string vectors.

pub mod entities;
pub mod errors;
pub mod identity;
pub mod transaction;

pub use entities::*;
pub use errors::*;
pub use identity::*;
pub use transaction::*;
