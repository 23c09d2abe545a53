//! # HM-02: Channel Lifecycle Subsystem
//!
//! Keeps externally managed protocol resources (TCP listeners, polling
//! schedules) in step with channel configuration.
//!
//! ## Architecture
//!
//! - **Domain**: reconciliation plan (`on_create`, `on_update`, `on_delete`,
//!   `reconcile`) and error types
//! - **Ports**: Inbound (`ChannelLifecycleApi`) and Outbound
//!   (`TcpListenerAdapter`, `PollingScheduler`)
//! - **Adapters**: event-bus backed collaborators
//! - **Service**: commit-then-notify orchestration
//!
//! Notifications for one channel are delivered in commit order; different
//! channels do not wait on each other.
//!
//! The registry commit is authoritative. A notification that fails is
//! logged and reported on the batch handle; it never rolls anything back.

pub mod adapters;
pub mod config;
mod delivery;
pub mod domain;
pub mod notify;
pub mod ports;
pub mod service;

pub use adapters::{BusPollingScheduler, BusTcpAdapter};
pub use config::LifecycleConfig;
pub use domain::{AdapterError, LifecycleAction, LifecycleError, Notification, NotifyError};
pub use notify::{Committed, NotifyHandle, NotifyReport};
pub use ports::{ChannelLifecycleApi, PollingScheduler, TcpListenerAdapter};
pub use service::ChannelLifecycleService;
