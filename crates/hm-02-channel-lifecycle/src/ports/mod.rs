//! Ports module for Channel Lifecycle

pub mod inbound;
pub mod outbound;

pub use inbound::ChannelLifecycleApi;
pub use outbound::{PollingScheduler, TcpListenerAdapter};
