//! # Routing Scenarios
//!
//! Priority resolution, no-fallback authorization and primary route
//! selection, exercised through the routing engine of a wired mediator.
//!
//! | Channel | Pattern                     | Priority | Allow |
//! |---------|-----------------------------|----------|-------|
//! | A       | `^/test/mock$`              | 2        | PoC   |
//! | B       | `^/.*$`                     | 3        | PoC   |
//! | C       | `^/test/undefined/priority$`| (none)   | PoC   |

#[cfg(test)]
mod tests {
    use crate::integration::harness::{http_channel, Mediator};
    use hm_03_channel_routing::RoutingError;
    use serde_json::json;

    // =========================================================================
    // PRIORITY
    // =========================================================================

    #[tokio::test]
    async fn test_lower_priority_wins() {
        let m = Mediator::new();
        m.create(http_channel("A", "^/test/mock$", Some(2), &["PoC"])).await;
        m.create(http_channel("B", "^/.*$", Some(3), &["PoC"])).await;

        let decision = m.route("/test/mock", "testApp", &["PoC"]).await.unwrap();
        assert_eq!(decision.channel_name, "A");
        assert_eq!(decision.route.name, "test route");
    }

    #[tokio::test]
    async fn test_unset_priority_loses_to_any_value() {
        let m = Mediator::new();
        m.create(http_channel("B", "^/.*$", Some(3), &["PoC"])).await;
        m.create(http_channel("C", "^/test/undefined/priority$", None, &["PoC"]))
            .await;

        let decision = m
            .route("/test/undefined/priority", "testApp", &["PoC"])
            .await
            .unwrap();
        assert_eq!(decision.channel_name, "B");
    }

    #[tokio::test]
    async fn test_unprioritised_channel_still_routes_alone() {
        let m = Mediator::new();
        m.create(http_channel("C", "^/test/undefined/priority$", None, &["PoC"]))
            .await;

        let decision = m
            .route("/test/undefined/priority", "testApp", &["PoC"])
            .await
            .unwrap();
        assert_eq!(decision.channel_name, "C");
    }

    #[tokio::test]
    async fn test_equal_priority_breaks_tie_by_name() {
        let m = Mediator::new();
        m.create(http_channel("zeta", "^/tie$", Some(1), &["PoC"])).await;
        m.create(http_channel("alpha", "^/tie$", Some(1), &["PoC"])).await;

        for _ in 0..5 {
            let decision = m.route("/tie", "testApp", &["PoC"]).await.unwrap();
            assert_eq!(decision.channel_name, "alpha");
        }
    }

    // =========================================================================
    // AUTHORIZATION
    // =========================================================================

    #[tokio::test]
    async fn test_denied_winner_does_not_fall_back() {
        let m = Mediator::new();
        m.create(http_channel("D", "/test/mock", Some(1), &["x"])).await;
        m.create(http_channel("E", "/test/mock", Some(2), &["PoC"])).await;

        let err = m.route("/test/mock", "testApp", &["PoC"]).await.unwrap_err();
        assert!(matches!(err, RoutingError::Unauthorized));
    }

    #[tokio::test]
    async fn test_client_id_grants_access() {
        let m = Mediator::new();
        m.create(http_channel("D", "/test/mock", Some(1), &["testApp"])).await;

        let decision = m.route("/test/mock", "testApp", &[]).await.unwrap();
        assert_eq!(decision.channel_name, "D");
    }

    #[tokio::test]
    async fn test_disabled_channels_are_not_candidates() {
        let m = Mediator::new();
        let mut d = http_channel("D", "/test/mock", Some(1), &["x"]);
        d["status"] = json!("disabled");
        m.create(d).await;
        m.create(http_channel("E", "/test/mock", Some(2), &["PoC"])).await;

        let decision = m.route("/test/mock", "testApp", &["PoC"]).await.unwrap();
        assert_eq!(decision.channel_name, "E");
    }

    #[tokio::test]
    async fn test_no_match_is_not_found() {
        let m = Mediator::new();
        m.create(http_channel("A", "^/test/mock$", Some(2), &["PoC"])).await;

        let err = m.route("/elsewhere", "testApp", &["PoC"]).await.unwrap_err();
        assert!(matches!(err, RoutingError::NotFound { .. }));
    }

    // =========================================================================
    // CONSISTENCY WITH ADMIN MUTATIONS
    // =========================================================================

    #[tokio::test]
    async fn test_priority_change_applies_to_next_transaction() {
        let m = Mediator::new();
        let a = m.create(http_channel("A", "^/test/mock$", Some(5), &["PoC"])).await;
        m.create(http_channel("B", "^/.*$", Some(3), &["PoC"])).await;
        assert_eq!(
            m.route("/test/mock", "testApp", &["PoC"]).await.unwrap().channel_name,
            "B"
        );

        m.update(&a, json!({ "priority": 1 })).await;
        assert_eq!(
            m.route("/test/mock", "testApp", &["PoC"]).await.unwrap().channel_name,
            "A"
        );
    }

    #[tokio::test]
    async fn test_deleted_channel_stops_matching() {
        let m = Mediator::new();
        let a = m.create(http_channel("A", "^/test/mock$", Some(1), &["PoC"])).await;
        m.create(http_channel("B", "^/.*$", Some(3), &["PoC"])).await;

        m.delete(&a).await;
        let decision = m.route("/test/mock", "testApp", &["PoC"]).await.unwrap();
        assert_eq!(decision.channel_name, "B");
    }

    #[tokio::test]
    async fn test_soft_deleted_channel_stops_matching() {
        let m = Mediator::new();
        let a = m.create(http_channel("A", "^/test/mock$", Some(1), &["PoC"])).await;
        m.container.transactions.record(a.id);

        m.delete(&a).await;
        let err = m.route("/test/mock", "testApp", &["PoC"]).await.unwrap_err();
        assert!(matches!(err, RoutingError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_primary_route_is_selected_among_several() {
        let m = Mediator::new();
        m.create(json!({
            "name": "multi",
            "urlPattern": "^/multi$",
            "allow": ["PoC"],
            "routes": [
                { "name": "secondary", "host": "localhost", "port": 9000 },
                { "name": "main", "host": "localhost", "port": 9001, "primary": true },
                { "name": "old-main", "host": "localhost", "port": 9002, "primary": true, "status": "disabled" }
            ]
        }))
        .await;

        let decision = m.route("/multi", "testApp", &["PoC"]).await.unwrap();
        assert_eq!(decision.route.name, "main");
        assert_eq!(decision.route.port, 9001);
    }
}
