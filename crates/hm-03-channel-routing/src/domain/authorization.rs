//! Authorization
//!
//! Two rule sets:
//! - transaction routing: the caller's `roles ∪ {clientID}` must intersect
//!   the winning channel's `allow`; no other candidate is ever consulted
//! - administration: privileged callers may do anything; others may only
//!   view channels whose `txViewAcl` is one of their groups

use shared_types::entities::Channel;
use shared_types::identity::{AdminCaller, ClientIdentity};
use tracing::debug;

use super::errors::RoutingError;

/// Gate for the routing path. `None` is an unauthenticated caller.
pub fn authorize(channel: &Channel, caller: Option<&ClientIdentity>) -> Result<(), RoutingError> {
    let Some(caller) = caller else {
        debug!(channel_id = %channel.id, "Rejecting unauthenticated caller");
        return Err(RoutingError::Unauthorized);
    };

    if channel.allow.intersects(&caller.tokens()) {
        Ok(())
    } else {
        debug!(
            channel_id = %channel.id,
            client_id = %caller.client_id,
            "Caller not in channel allow list"
        );
        Err(RoutingError::Unauthorized)
    }
}

/// Administrative read access.
#[must_use]
pub fn can_view(caller: &AdminCaller, channel: &Channel) -> bool {
    caller.privileged || channel.visible_to(&caller.groups)
}

/// Administrative write access. Payload never matters.
#[must_use]
pub fn can_mutate(caller: &AdminCaller) -> bool {
    caller.privileged
}

/// Manual trigger: anyone who may view the channel.
#[must_use]
pub fn can_trigger(caller: &AdminCaller, channel: &Channel) -> bool {
    can_view(caller, channel)
}
