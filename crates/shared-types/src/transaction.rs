//! # Transactions
//!
//! What the routing engine is told about an inbound transaction, and the
//! record it emits once a dispatch has finished.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::ChannelId;

/// How a transaction reached the mediator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum InboundProtocol {
    /// An HTTP request on the shared HTTP receiver.
    Http,
    /// A connection accepted by the TCP listener bound for `channel_id`.
    Tcp { channel_id: ChannelId },
    /// A scheduler poll (or manual trigger) for `channel_id`.
    Polling { channel_id: ChannelId },
}

/// Input to the matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDescriptor {
    pub protocol: InboundProtocol,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default)]
    pub manual_trigger: bool,
}

impl TransactionDescriptor {
    pub fn http(path: impl Into<String>) -> Self {
        Self {
            protocol: InboundProtocol::Http,
            path: path.into(),
            method: None,
            manual_trigger: false,
        }
    }

    pub fn tcp(channel_id: ChannelId) -> Self {
        Self {
            protocol: InboundProtocol::Tcp { channel_id },
            path: "/".to_string(),
            method: None,
            manual_trigger: false,
        }
    }

    pub fn poll(channel_id: ChannelId, manual_trigger: bool) -> Self {
        Self {
            protocol: InboundProtocol::Polling { channel_id },
            path: "/".to_string(),
            method: None,
            manual_trigger,
        }
    }

    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }
}

/// Final state of a dispatched transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispatchStatus {
    Successful,
    Completed,
    #[serde(rename = "Completed with error(s)")]
    CompletedWithErrors,
    Failed,
}

/// Completed-transaction record handed to the metrics and culling
/// collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRecord {
    pub channel_id: ChannelId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    pub route: String,
    pub status: DispatchStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_code: Option<u16>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl DispatchRecord {
    /// Wall-clock response time in milliseconds, never negative.
    #[must_use]
    pub fn response_time_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds().max(0)
    }
}
