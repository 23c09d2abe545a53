//! # HM-01: Channel Registry Subsystem
//!
//! Owns channel configuration: validation, durable commit, the append-only
//! audit log, soft delete, and the registry cache the routing path reads.
//!
//! ## Architecture
//!
//! - **Domain**: drafts, validation rules, diffing, delete decision
//! - **Ports**: Inbound (`ChannelRegistryApi`) and Outbound (`ChannelStore`,
//!   `PatchStore`, `TransactionCounter`)
//! - **Adapters**: in-memory stores
//! - **Cache**: lock-free snapshot of enabled channels
//! - **Service**: per-channel serialized mutation pipeline
//!
//! ## Mutation pipeline
//!
//! ```text
//! draft ─► resolve + validate ─► name check ─► commit ─► audit ─► cache refresh
//! ```

pub mod adapters;
pub mod cache;
pub mod config;
pub mod domain;
pub mod locks;
pub mod ports;
pub mod service;

pub use cache::{CachedChannel, RegistryCache, RegistrySnapshot};
pub use config::RegistryConfig;
pub use domain::{
    ChannelDraft, DeleteDecision, MutationStamp, RegistryError, RouteDraft, ValidationError,
    ValidationIssue,
};
pub use locks::{KeyedGuard, KeyedLocks};
pub use ports::inbound::{ChannelChange, ChannelRegistryApi, DeleteOutcome};
pub use ports::outbound::{ChannelStore, PatchStore, TransactionCounter};
pub use service::ChannelRegistryService;
