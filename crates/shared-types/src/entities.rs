//! # Core Domain Entities
//!
//! Defines the channel configuration model and the audit patch log.
//!
//! ## Clusters
//!
//! - **Routing**: `Channel`, `Route`, `ChannelType`, `ChannelStatus`
//! - **Audit**: `Patch`, `PatchOp`, `UpdatedBy`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::identity::RoleSet;

// =============================================================================
// CLUSTER A: ROUTING
// =============================================================================

/// Unique identifier of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub Uuid);

impl ChannelId {
    /// Generate a fresh random id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ChannelId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ChannelId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Protocol family served by a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelType {
    /// Inbound HTTP requests.
    #[default]
    Http,
    /// Raw TCP connections on a dedicated listener.
    Tcp,
    /// Scheduler-triggered polls.
    Polling,
    /// Anything else; never matched by inbound traffic.
    Other,
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Http => "http",
            Self::Tcp => "tcp",
            Self::Polling => "polling",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

/// Lifecycle status of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelStatus {
    #[default]
    Enabled,
    Disabled,
    /// Soft-deleted: kept for audit, never matched again.
    Deleted,
}

/// Status of a single route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteStatus {
    #[default]
    Enabled,
    Disabled,
}

/// A downstream destination owned by exactly one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub name: String,
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub status: RouteStatus,
    #[serde(default)]
    pub primary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_transform: Option<String>,
    /// Protocol hint; defaults to the owning channel's type.
    #[serde(rename = "type")]
    pub route_type: ChannelType,
}

impl Route {
    /// True for the route that receives forwarded traffic.
    #[must_use]
    pub fn is_active_primary(&self) -> bool {
        self.primary && self.status == RouteStatus::Enabled
    }
}

/// Who performed a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatedBy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
}

impl UpdatedBy {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
        }
    }
}

/// The routing unit.
///
/// A committed channel always satisfies:
/// - exactly one route that is primary and enabled;
/// - `priority`, when present, is at least 1;
/// - `name` is unique among non-deleted channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: ChannelId,
    pub name: String,
    /// Regular expression tested against the full request path.
    pub url_pattern: String,
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    pub status: ChannelStatus,
    /// Lower wins; absent sorts after every present value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    #[serde(default)]
    pub allow: RoleSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_view_acl: Option<String>,
    pub routes: Vec<Route>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp_host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polling_schedule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_body_age_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_body_cleared: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<UpdatedBy>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Channel {
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.status == ChannelStatus::Enabled
    }

    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.status == ChannelStatus::Deleted
    }

    /// Routes that are both primary and enabled.
    pub fn active_primary_routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter().filter(|r| r.is_active_primary())
    }

    /// Whether a non-privileged caller in `groups` may see this channel.
    #[must_use]
    pub fn visible_to(&self, groups: &RoleSet) -> bool {
        self.tx_view_acl
            .as_deref()
            .is_some_and(|acl| groups.contains(acl))
    }
}

// =============================================================================
// CLUSTER B: AUDIT
// =============================================================================

/// Kind of a single diff operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOpKind {
    Add,
    Replace,
    Remove,
}

/// One field-level change, addressed by a JSON pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOp {
    pub op: PatchOpKind,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

impl PatchOp {
    pub fn add(path: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            op: PatchOpKind::Add,
            path: path.into(),
            value: Some(value),
        }
    }

    pub fn replace(path: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            op: PatchOpKind::Replace,
            path: path.into(),
            value: Some(value),
        }
    }

    pub fn remove(path: impl Into<String>) -> Self {
        Self {
            op: PatchOpKind::Remove,
            path: path.into(),
            value: None,
        }
    }
}

/// One append-only audit entry for a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patch {
    pub id: Uuid,
    #[serde(rename = "ref")]
    pub channel_id: ChannelId,
    pub ops: Vec<PatchOp>,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<UpdatedBy>,
}
