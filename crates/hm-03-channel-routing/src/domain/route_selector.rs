//! Primary route selection

use shared_types::entities::{Channel, Route};
use tracing::error;

use super::errors::RoutingError;

/// The unique enabled primary route. Anything else means validation was
/// bypassed and is reported as a fatal configuration error.
pub fn select_primary(channel: &Channel) -> Result<&Route, RoutingError> {
    let mut active = channel.active_primary_routes();
    match (active.next(), active.next()) {
        (Some(route), None) => Ok(route),
        (None, _) => {
            error!(channel_id = %channel.id, name = %channel.name, "Channel has no enabled primary route");
            Err(RoutingError::FatalConfig {
                channel_id: channel.id,
                reason: "no enabled primary route".into(),
            })
        }
        (Some(_), Some(_)) => {
            error!(channel_id = %channel.id, name = %channel.name, "Channel has several enabled primary routes");
            Err(RoutingError::FatalConfig {
                channel_id: channel.id,
                reason: "more than one enabled primary route".into(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::{channel, route};
    use shared_types::entities::RouteStatus;

    #[test]
    fn test_selects_enabled_primary() {
        let mut c = channel("A", "/", None, &[]);
        c.routes = vec![
            route("disabled-primary", true, RouteStatus::Disabled),
            route("secondary", false, RouteStatus::Enabled),
            route("main", true, RouteStatus::Enabled),
        ];
        assert_eq!(select_primary(&c).unwrap().name, "main");
    }

    #[test]
    fn test_missing_primary_is_fatal() {
        let mut c = channel("A", "/", None, &[]);
        c.routes = vec![route("secondary", false, RouteStatus::Enabled)];
        assert!(matches!(
            select_primary(&c),
            Err(RoutingError::FatalConfig { .. })
        ));

        c.routes = vec![
            route("a", true, RouteStatus::Enabled),
            route("b", true, RouteStatus::Enabled),
        ];
        assert!(matches!(
            select_primary(&c),
            Err(RoutingError::FatalConfig { .. })
        ));
    }
}
