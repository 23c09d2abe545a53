//! Reconciliation planning
//!
//! Pure functions from committed channel states to the notifications the
//! TCP adapter and polling scheduler must receive. Within one plan, stops
//! and deregistrations always precede starts and registrations.

use serde::Serialize;
use shared_types::entities::{Channel, ChannelStatus, ChannelType};
use std::fmt;

/// One call to an external protocol collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LifecycleAction {
    StartTcpListener,
    StopTcpListener,
    RegisterPolling,
    DeregisterPolling,
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::StartTcpListener => "start tcp listener",
            Self::StopTcpListener => "stop tcp listener",
            Self::RegisterPolling => "register polling channel",
            Self::DeregisterPolling => "deregister polling channel",
        };
        f.write_str(s)
    }
}

/// An action plus the channel state the collaborator should act on.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub action: LifecycleAction,
    pub channel: Channel,
}

impl Notification {
    pub(crate) fn new(action: LifecycleAction, channel: &Channel) -> Self {
        Self {
            action,
            channel: channel.clone(),
        }
    }
}

fn tcp_active(c: &Channel) -> bool {
    c.channel_type == ChannelType::Tcp && c.is_enabled()
}

fn tcp_disabled(c: &Channel) -> bool {
    c.channel_type == ChannelType::Tcp && c.status == ChannelStatus::Disabled
}

fn polling_active(c: &Channel) -> bool {
    c.channel_type == ChannelType::Polling && c.is_enabled()
}

fn tcp_rebound(before: &Channel, after: &Channel) -> bool {
    before.tcp_host != after.tcp_host
        || before.tcp_port != after.tcp_port
        || before.name != after.name
        || before.url_pattern != after.url_pattern
}

fn polling_rebound(before: &Channel, after: &Channel) -> bool {
    before.polling_schedule != after.polling_schedule
        || before.name != after.name
        || before.url_pattern != after.url_pattern
}

/// Notifications for a freshly created channel. Disabled channels get none.
#[must_use]
pub fn on_create(after: &Channel) -> Vec<Notification> {
    let mut plan = Vec::new();
    if tcp_active(after) {
        plan.push(Notification::new(LifecycleAction::StartTcpListener, after));
    }
    if polling_active(after) {
        plan.push(Notification::new(LifecycleAction::RegisterPolling, after));
    }
    plan
}

/// Notifications for an update, driven by the before/after {type, status}
/// pair and, for channels active on both sides, by binding changes. An
/// update that ends on an enabled polling channel always registers it.
#[must_use]
pub fn on_update(before: &Channel, after: &Channel) -> Vec<Notification> {
    let mut teardown = Vec::new();
    let mut bringup = Vec::new();

    match (tcp_active(before), tcp_active(after)) {
        (false, true) => bringup.push(Notification::new(LifecycleAction::StartTcpListener, after)),
        (true, true) if tcp_rebound(before, after) => {
            teardown.push(Notification::new(LifecycleAction::StopTcpListener, before));
            bringup.push(Notification::new(LifecycleAction::StartTcpListener, after));
        }
        (true, false) => teardown.push(Notification::new(LifecycleAction::StopTcpListener, before)),
        // Landing on a disabled tcp channel makes sure nothing is bound,
        // unless it already was a disabled tcp channel.
        (false, false) if tcp_disabled(after) && !tcp_disabled(before) => {
            teardown.push(Notification::new(LifecycleAction::StopTcpListener, after));
        }
        _ => {}
    }

    // Any update landing on an enabled polling channel registers it again;
    // the scheduler treats register as upsert.
    let was_polling = before.channel_type == ChannelType::Polling;
    match (polling_active(before), polling_active(after)) {
        (false, true) => bringup.push(Notification::new(LifecycleAction::RegisterPolling, after)),
        (true, true) => {
            if polling_rebound(before, after) {
                teardown.push(Notification::new(LifecycleAction::DeregisterPolling, before));
            }
            bringup.push(Notification::new(LifecycleAction::RegisterPolling, after));
        }
        (true, false) => {
            teardown.push(Notification::new(LifecycleAction::DeregisterPolling, before));
        }
        (false, false) if was_polling && after.channel_type != ChannelType::Polling => {
            teardown.push(Notification::new(LifecycleAction::DeregisterPolling, before));
        }
        _ => {}
    }

    teardown.extend(bringup);
    teardown
}

/// Teardown for a delete, based on the state immediately before it.
/// Polling channels are always deregistered, whatever their status.
#[must_use]
pub fn on_delete(before: &Channel) -> Vec<Notification> {
    let mut plan = Vec::new();
    if tcp_active(before) {
        plan.push(Notification::new(LifecycleAction::StopTcpListener, before));
    }
    if before.channel_type == ChannelType::Polling {
        plan.push(Notification::new(LifecycleAction::DeregisterPolling, before));
    }
    plan
}

/// Bring-up for every active tcp/polling channel, used after a restart.
#[must_use]
pub fn reconcile(channels: &[Channel]) -> Vec<Notification> {
    channels.iter().flat_map(on_create).collect()
}
