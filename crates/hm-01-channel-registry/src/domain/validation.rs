//! Channel validation rules
//!
//! Everything here is pure: the checks run on a fully merged candidate
//! channel before anything touches the store. Name uniqueness needs the
//! store and lives in the service.

use serde::Serialize;
use shared_types::entities::{Channel, ChannelStatus, ChannelType, Route};
use std::fmt;
use thiserror::Error;

/// Inclusive bounds for `maxBodyAgeDays`.
pub const MAX_BODY_AGE_DAYS: std::ops::RangeInclusive<i64> = 1..=36_500;

/// A single reason a channel configuration was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "camelCase")]
pub enum ValidationIssue {
    NameMissing,
    UrlPatternMissing,
    UrlPatternInvalid { reason: String },
    StatusReserved,
    PriorityBelowOne { value: i64 },
    PriorityTooLarge { value: i64 },
    NoRoutes,
    PrimaryRouteCount { found: usize },
    RouteNameMissing { index: usize },
    RouteHostMissing { route: String },
    RoutePortOutOfRange { route: String, value: i64 },
    PathAndTransform { route: String },
    PathTransformMalformed { route: String, value: String },
    TcpPortMissing,
    TcpPortOutOfRange { value: i64 },
    PollingScheduleMissing,
    MaxBodyAgeOutOfRange { value: i64 },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameMissing => write!(f, "name is required"),
            Self::UrlPatternMissing => write!(f, "urlPattern is required"),
            Self::UrlPatternInvalid { reason } => write!(f, "urlPattern does not compile: {reason}"),
            Self::StatusReserved => {
                write!(f, "status 'deleted' can only be reached by deleting the channel")
            }
            Self::PriorityBelowOne { value } => write!(f, "priority must be >= 1, got {value}"),
            Self::PriorityTooLarge { value } => write!(f, "priority {value} is out of range"),
            Self::NoRoutes => write!(f, "at least one route is required"),
            Self::PrimaryRouteCount { found } => write!(
                f,
                "exactly one enabled primary route is required, found {found}"
            ),
            Self::RouteNameMissing { index } => write!(f, "route {index} has no name"),
            Self::RouteHostMissing { route } => write!(f, "route '{route}' has no host"),
            Self::RoutePortOutOfRange { route, value } => {
                write!(f, "route '{route}' port {value} is outside 1..=65535")
            }
            Self::PathAndTransform { route } => write!(
                f,
                "route '{route}' cannot set both path and pathTransform"
            ),
            Self::PathTransformMalformed { route, value } => write!(
                f,
                "route '{route}' pathTransform '{value}' is not of the form s/from/to[/g]"
            ),
            Self::TcpPortMissing => write!(f, "tcp channels require tcpPort"),
            Self::TcpPortOutOfRange { value } => {
                write!(f, "tcpPort {value} is outside 1..=65535")
            }
            Self::PollingScheduleMissing => write!(f, "polling channels require pollingSchedule"),
            Self::MaxBodyAgeOutOfRange { value } => {
                write!(f, "maxBodyAgeDays {value} is outside 1..=36500")
            }
        }
    }
}

/// Rejected channel configuration. Carries every issue found, not just the
/// first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("channel validation failed: {}", join(.issues))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

fn join(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    #[must_use]
    pub fn single(issue: ValidationIssue) -> Self {
        Self {
            issues: vec![issue],
        }
    }

    #[must_use]
    pub fn contains(&self, issue: &ValidationIssue) -> bool {
        self.issues.contains(issue)
    }
}

/// Anchor a stored pattern so it must match the whole path.
#[must_use]
pub fn anchored(pattern: &str) -> String {
    format!("^(?:{pattern})$")
}

/// A parsed `s/from/to[/g]` path rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTransform {
    pub from: String,
    pub to: String,
    pub global: bool,
}

/// Parse sed-style substitution. `\/` escapes a slash inside either part.
#[must_use]
pub fn parse_path_transform(value: &str) -> Option<PathTransform> {
    let body = value.strip_prefix("s/")?;

    let mut parts = vec![String::new()];
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let current = parts.last_mut()?;
                current.push('\\');
                current.push(chars.next()?);
            }
            '/' => parts.push(String::new()),
            other => parts.last_mut()?.push(other),
        }
    }

    let global = match parts.len() {
        2 => false,
        3 => match parts[2].as_str() {
            "" => false,
            "g" => true,
            _ => return None,
        },
        _ => return None,
    };

    if parts[0].is_empty() {
        return None;
    }

    Some(PathTransform {
        from: parts[0].clone(),
        to: parts[1].clone(),
        global,
    })
}

/// Route-level and channel-level structural checks.
///
/// Numeric range checks on raw input happen while the draft is resolved;
/// this function only sees typed values.
pub fn check_channel(channel: &Channel, issues: &mut Vec<ValidationIssue>) {
    if channel.name.trim().is_empty() {
        issues.push(ValidationIssue::NameMissing);
    }

    if channel.url_pattern.is_empty() {
        issues.push(ValidationIssue::UrlPatternMissing);
    } else if let Err(e) = regex::Regex::new(&anchored(&channel.url_pattern)) {
        issues.push(ValidationIssue::UrlPatternInvalid {
            reason: e.to_string(),
        });
    }

    if channel.status == ChannelStatus::Deleted {
        issues.push(ValidationIssue::StatusReserved);
    }

    match channel.channel_type {
        ChannelType::Tcp if channel.tcp_port.is_none() => {
            issues.push(ValidationIssue::TcpPortMissing);
        }
        ChannelType::Polling
            if channel
                .polling_schedule
                .as_deref()
                .map_or(true, |s| s.trim().is_empty()) =>
        {
            issues.push(ValidationIssue::PollingScheduleMissing);
        }
        _ => {}
    }

    check_routes(&channel.routes, issues);
}

fn check_routes(routes: &[Route], issues: &mut Vec<ValidationIssue>) {
    if routes.is_empty() {
        issues.push(ValidationIssue::NoRoutes);
        return;
    }

    for (index, route) in routes.iter().enumerate() {
        if route.name.trim().is_empty() {
            issues.push(ValidationIssue::RouteNameMissing { index });
        }
        if route.host.trim().is_empty() {
            issues.push(ValidationIssue::RouteHostMissing {
                route: route.name.clone(),
            });
        }
        if route.path.is_some() && route.path_transform.is_some() {
            issues.push(ValidationIssue::PathAndTransform {
                route: route.name.clone(),
            });
        }
        if let Some(transform) = &route.path_transform {
            if parse_path_transform(transform).is_none() {
                issues.push(ValidationIssue::PathTransformMalformed {
                    route: route.name.clone(),
                    value: transform.clone(),
                });
            }
        }
    }

    let found = routes.iter().filter(|r| r.is_active_primary()).count();
    if found != 1 {
        issues.push(ValidationIssue::PrimaryRouteCount { found });
    }
}
