//! Channel drafts
//!
//! A draft is what an administrator submits: every field optional, numbers
//! still raw. Resolving a draft against nothing (create) or against the
//! stored channel (update) yields a fully validated `Channel` or every
//! reason it was rejected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use shared_types::entities::{
    Channel, ChannelId, ChannelStatus, ChannelType, Route, RouteStatus, UpdatedBy,
};
use shared_types::identity::RoleSet;

use super::validation::{check_channel, ValidationError, ValidationIssue, MAX_BODY_AGE_DAYS};

/// Distinguishes "field absent" (`None`) from "field set to null"
/// (`Some(None)`).
fn nullable<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// Submitted route. Missing fields take defaults on resolve.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: i64,
    pub status: Option<RouteStatus>,
    pub primary: Option<bool>,
    pub path: Option<String>,
    pub path_transform: Option<String>,
    #[serde(rename = "type")]
    pub route_type: Option<ChannelType>,
}

/// Submitted channel, used for both create and partial update.
///
/// On update only present fields replace stored values; `routes`, when
/// present, replaces the whole list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelDraft {
    /// Id to give a newly created channel. Never read from the wire and
    /// ignored on update.
    #[serde(skip)]
    pub id: Option<ChannelId>,
    pub name: Option<String>,
    pub url_pattern: Option<String>,
    #[serde(rename = "type")]
    pub channel_type: Option<ChannelType>,
    pub status: Option<ChannelStatus>,
    #[serde(default, deserialize_with = "nullable")]
    pub priority: Option<Option<i64>>,
    pub allow: Option<RoleSet>,
    #[serde(default, deserialize_with = "nullable")]
    pub tx_view_acl: Option<Option<String>>,
    pub routes: Option<Vec<RouteDraft>>,
    #[serde(default, deserialize_with = "nullable")]
    pub tcp_host: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub tcp_port: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub polling_schedule: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub max_body_age_days: Option<Option<i64>>,
}

/// Who and when, stamped onto every resolved channel.
#[derive(Debug, Clone)]
pub struct MutationStamp {
    pub actor: UpdatedBy,
    pub at: DateTime<Utc>,
}

impl MutationStamp {
    pub fn now(actor: UpdatedBy) -> Self {
        Self {
            actor,
            at: Utc::now(),
        }
    }
}

fn pick<T: Clone>(patch: Option<Option<T>>, base: Option<&Option<T>>) -> Option<T> {
    match patch {
        Some(value) => value,
        None => base.cloned().flatten(),
    }
}

fn port_in_range(value: i64) -> Option<u16> {
    u16::try_from(value).ok().filter(|p| *p >= 1)
}

impl ChannelDraft {
    /// Resolve against `base` (update) or defaults (create) and validate the
    /// merged result as a whole.
    pub fn resolve(
        self,
        base: Option<&Channel>,
        stamp: &MutationStamp,
    ) -> Result<Channel, ValidationError> {
        let mut issues = Vec::new();
        let assigned = self.id;

        let channel_type = self
            .channel_type
            .or(base.map(|b| b.channel_type))
            .unwrap_or_default();

        let priority = match pick(self.priority, base.map(|b| b.priority.map(i64::from)).as_ref()) {
            None => None,
            Some(value) if value < 1 => {
                issues.push(ValidationIssue::PriorityBelowOne { value });
                None
            }
            Some(value) => match u32::try_from(value) {
                Ok(p) => Some(p),
                Err(_) => {
                    issues.push(ValidationIssue::PriorityTooLarge { value });
                    None
                }
            },
        };

        let tcp_port = match pick(self.tcp_port, base.map(|b| b.tcp_port.map(i64::from)).as_ref()) {
            None => None,
            Some(value) => {
                let port = port_in_range(value);
                if port.is_none() {
                    issues.push(ValidationIssue::TcpPortOutOfRange { value });
                }
                port
            }
        };

        let max_body_age_days = match pick(
            self.max_body_age_days,
            base.map(|b| b.max_body_age_days.map(i64::from)).as_ref(),
        ) {
            None => None,
            Some(value) if MAX_BODY_AGE_DAYS.contains(&value) => u32::try_from(value).ok(),
            Some(value) => {
                issues.push(ValidationIssue::MaxBodyAgeOutOfRange { value });
                None
            }
        };

        let routes = match self.routes {
            Some(drafts) => drafts
                .into_iter()
                .map(|r| r.resolve(channel_type, &mut issues))
                .collect(),
            None => base.map(|b| b.routes.clone()).unwrap_or_default(),
        };

        let channel = Channel {
            id: base.map_or_else(|| assigned.unwrap_or_else(ChannelId::new), |b| b.id),
            name: self
                .name
                .or_else(|| base.map(|b| b.name.clone()))
                .unwrap_or_default(),
            url_pattern: self
                .url_pattern
                .or_else(|| base.map(|b| b.url_pattern.clone()))
                .unwrap_or_default(),
            channel_type,
            status: self
                .status
                .or(base.map(|b| b.status))
                .unwrap_or_default(),
            priority,
            allow: self
                .allow
                .or_else(|| base.map(|b| b.allow.clone()))
                .unwrap_or_default(),
            tx_view_acl: pick(self.tx_view_acl, base.map(|b| &b.tx_view_acl)),
            routes,
            tcp_host: pick(self.tcp_host, base.map(|b| &b.tcp_host)),
            tcp_port,
            polling_schedule: pick(self.polling_schedule, base.map(|b| &b.polling_schedule)),
            max_body_age_days,
            last_body_cleared: base.and_then(|b| b.last_body_cleared),
            updated_by: Some(stamp.actor.clone()),
            created_at: base.map_or(stamp.at, |b| b.created_at),
            updated_at: stamp.at,
        };

        check_channel(&channel, &mut issues);

        if issues.is_empty() {
            Ok(channel)
        } else {
            Err(ValidationError { issues })
        }
    }
}

impl RouteDraft {
    fn resolve(self, channel_type: ChannelType, issues: &mut Vec<ValidationIssue>) -> Route {
        let port = port_in_range(self.port).unwrap_or_else(|| {
            issues.push(ValidationIssue::RoutePortOutOfRange {
                route: self.name.clone(),
                value: self.port,
            });
            0
        });

        Route {
            name: self.name,
            host: self.host,
            port,
            status: self.status.unwrap_or_default(),
            primary: self.primary.unwrap_or(false),
            path: self.path,
            path_transform: self.path_transform,
            route_type: self.route_type.unwrap_or(channel_type),
        }
    }
}
