//! # Validation Scenarios
//!
//! Configuration rules enforced identically on create and update, with
//! rejected updates leaving the stored channel untouched.

#[cfg(test)]
mod tests {
    use crate::integration::harness::{http_channel, Mediator, ROOT_TOKEN};
    use axum::http::StatusCode;
    use hm_01_channel_registry::ChannelRegistryApi;
    use serde_json::{json, Value};

    fn route(name: &str, primary: bool, status: &str) -> Value {
        json!({ "name": name, "host": "localhost", "port": 9876, "primary": primary, "status": status })
    }

    fn rules(body: &Value) -> Vec<String> {
        body["details"]
            .as_array()
            .map(|issues| {
                issues
                    .iter()
                    .filter_map(|i| i["rule"].as_str().map(str::to_owned))
                    .collect()
            })
            .unwrap_or_default()
    }

    async fn post(m: &Mediator, body: Value) -> (StatusCode, Value) {
        m.call("POST", "/channels", Some(ROOT_TOKEN), Some(body)).await
    }

    // =========================================================================
    // PRIMARY ROUTE COUNT
    // =========================================================================

    #[tokio::test]
    async fn test_no_primary_route_rejected() {
        let m = Mediator::new();
        let mut body = http_channel("no-primary-route-test", "test/sample", None, &["PoC"]);
        body["routes"] = json!([route("r1", false, "enabled")]);

        let (status, body) = post(&m, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(rules(&body), vec!["primaryRouteCount"]);
    }

    #[tokio::test]
    async fn test_two_enabled_primaries_rejected() {
        let m = Mediator::new();
        let mut body = http_channel("two-primaries", "test/sample", None, &["PoC"]);
        body["routes"] = json!([route("r1", true, "enabled"), route("r2", true, "enabled")]);

        let (status, body) = post(&m, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(rules(&body), vec!["primaryRouteCount"]);
    }

    #[tokio::test]
    async fn test_disabled_second_primary_accepted() {
        let m = Mediator::new();
        let mut body = http_channel("one-live-primary", "test/sample", None, &["PoC"]);
        body["routes"] = json!([route("r1", true, "enabled"), route("r2", true, "disabled")]);

        let (status, body) = post(&m, body).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["routes"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_empty_routes_rejected() {
        let m = Mediator::new();
        let mut body = http_channel("no-routes", "test/sample", None, &["PoC"]);
        body["routes"] = json!([]);

        let (status, body) = post(&m, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(rules(&body).contains(&"noRoutes".to_string()));
    }

    // =========================================================================
    // ROUTE PATHS
    // =========================================================================

    #[tokio::test]
    async fn test_path_and_transform_together_rejected() {
        let m = Mediator::new();
        let mut body = http_channel("both-paths", "test/sample", None, &["PoC"]);
        body["routes"] = json!([{
            "name": "r1", "host": "localhost", "port": 9876, "primary": true,
            "path": "/api/test", "pathTransform": "s/foo/bar"
        }]);

        let (status, body) = post(&m, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(rules(&body), vec!["pathAndTransform"]);
    }

    #[tokio::test]
    async fn test_path_alone_accepted() {
        let m = Mediator::new();
        let mut body = http_channel("path-only", "test/sample", None, &["PoC"]);
        body["routes"] = json!([{
            "name": "r1", "host": "localhost", "port": 9876, "primary": true,
            "path": "/api/test"
        }]);

        let (status, _) = post(&m, body).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    // =========================================================================
    // PRIORITY
    // =========================================================================

    #[tokio::test]
    async fn test_negative_priority_rejected_on_create() {
        let m = Mediator::new();
        let body = http_channel("negative", "test/sample", Some(-1), &["PoC"]);

        let (status, body) = post(&m, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(rules(&body), vec!["priorityBelowOne"]);
        assert!(m.container.registry.list_channels().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_negative_priority_rejected_on_update_without_side_effects() {
        let m = Mediator::new();
        let stored = m
            .create(http_channel("TestChannel1", "test/sample", Some(4), &["PoC"]))
            .await;

        let uri = format!("/channels/{}", stored.id);
        let (status, body) = m
            .call(
                "PUT",
                &uri,
                Some(ROOT_TOKEN),
                Some(json!({ "name": "renamed", "priority": -1 })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(rules(&body), vec!["priorityBelowOne"]);

        let after = m.container.registry.get_channel(stored.id).await.unwrap();
        assert_eq!(after, stored);
        let audits = m.container.registry.channel_audits(stored.id).await.unwrap();
        assert_eq!(audits.len(), 1);
    }

    // =========================================================================
    // PROTOCOL FIELDS
    // =========================================================================

    #[tokio::test]
    async fn test_tcp_without_port_rejected() {
        let m = Mediator::new();
        let mut body = http_channel("tcp-no-port", "tcp", None, &[]);
        body["type"] = json!("tcp");
        body["tcpHost"] = json!("0.0.0.0");

        let (status, body) = post(&m, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(rules(&body).contains(&"tcpPortMissing".to_string()));
    }

    #[tokio::test]
    async fn test_polling_without_schedule_rejected() {
        let m = Mediator::new();
        let mut body = http_channel("poll-no-schedule", "/poll", None, &[]);
        body["type"] = json!("polling");

        let (status, body) = post(&m, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(rules(&body).contains(&"pollingScheduleMissing".to_string()));
    }

    #[tokio::test]
    async fn test_every_violation_reported_at_once() {
        let m = Mediator::new();
        let body = json!({
            "name": "many-problems",
            "urlPattern": "test/sample",
            "priority": 0,
            "routes": [route("r1", false, "enabled")]
        });

        let (status, body) = post(&m, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let found = rules(&body);
        assert!(found.contains(&"priorityBelowOne".to_string()));
        assert!(found.contains(&"primaryRouteCount".to_string()));
    }
}
