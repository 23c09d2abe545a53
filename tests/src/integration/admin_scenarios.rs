//! # Admin Scenarios
//!
//! The administrative surface end to end: bearer identity, visibility
//! filtering, privileged-only mutation, audit history and manual trigger.

#[cfg(test)]
mod tests {
    use crate::integration::harness::{http_channel, Mediator, ROOT_TOKEN, VIEWER_TOKEN};
    use axum::http::StatusCode;
    use serde_json::{json, Value};
    use shared_bus::{EventTopic, MediatorEvent};
    use shared_types::entities::ChannelId;

    fn names(body: &Value) -> Vec<String> {
        let mut names: Vec<String> = body
            .as_array()
            .map(|channels| {
                channels
                    .iter()
                    .filter_map(|c| c["name"].as_str().map(str::to_owned))
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }

    async fn seed_visibility(m: &Mediator) -> (ChannelId, ChannelId) {
        let mut shared = http_channel("shared", "/shared", None, &[]);
        shared["txViewAcl"] = json!("group1");
        let shared = m.create(shared).await;
        let hidden = m.create(http_channel("hidden", "/hidden", None, &[])).await;
        (shared.id, hidden.id)
    }

    // =========================================================================
    // IDENTITY
    // =========================================================================

    #[tokio::test]
    async fn test_unknown_token_rejected() {
        let m = Mediator::new();
        let (status, body) = m.call("GET", "/channels", Some("nope"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Unauthenticated");
    }

    // =========================================================================
    // VISIBILITY
    // =========================================================================

    #[tokio::test]
    async fn test_listing_respects_view_acl() {
        let m = Mediator::new();
        seed_visibility(&m).await;

        let (status, body) = m.call("GET", "/channels", Some(VIEWER_TOKEN), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&body), vec!["shared"]);

        let (status, body) = m.call("GET", "/channels", Some(ROOT_TOKEN), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&body), vec!["hidden", "shared"]);
    }

    #[tokio::test]
    async fn test_get_respects_view_acl() {
        let m = Mediator::new();
        let (shared, hidden) = seed_visibility(&m).await;

        let (status, _) = m
            .call("GET", &format!("/channels/{shared}"), Some(VIEWER_TOKEN), None)
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = m
            .call("GET", &format!("/channels/{hidden}"), Some(VIEWER_TOKEN), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Forbidden");
    }

    // =========================================================================
    // MUTATION
    // =========================================================================

    #[tokio::test]
    async fn test_non_privileged_mutation_forbidden_whatever_the_payload() {
        let m = Mediator::new();
        let (shared, _) = seed_visibility(&m).await;
        let uri = format!("/channels/{shared}");

        let valid = http_channel("new", "/new", Some(1), &["PoC"]);
        let invalid = json!({ "priority": -1, "routes": [] });

        for body in [valid.clone(), invalid.clone()] {
            let (status, _) = m
                .call("POST", "/channels", Some(VIEWER_TOKEN), Some(body))
                .await;
            assert_eq!(status, StatusCode::FORBIDDEN);
        }
        for body in [valid, invalid] {
            let (status, _) = m.call("PUT", &uri, Some(VIEWER_TOKEN), Some(body)).await;
            assert_eq!(status, StatusCode::FORBIDDEN);
        }
        let (status, _) = m.call("DELETE", &uri, Some(VIEWER_TOKEN), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (_, body) = m.call("GET", "/channels", Some(ROOT_TOKEN), None).await;
        assert_eq!(names(&body), vec!["hidden", "shared"]);
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts() {
        let m = Mediator::new();
        m.create(http_channel("taken", "/a", None, &[])).await;

        let (status, body) = m
            .call(
                "POST",
                "/channels",
                Some(ROOT_TOKEN),
                Some(http_channel("taken", "/b", None, &[])),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Conflict");
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let m = Mediator::new();
        let channel = m.create(http_channel("gone", "/gone", None, &[])).await;
        let uri = format!("/channels/{}", channel.id);

        let (status, body) = m.call("DELETE", &uri, Some(ROOT_TOKEN), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "The channel was successfully deleted");

        let (status, _) = m.call("GET", &uri, Some(ROOT_TOKEN), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    // =========================================================================
    // AUDITS
    // =========================================================================

    #[tokio::test]
    async fn test_audits_only_cover_requested_channel() {
        let m = Mediator::new();
        let first = m.create(http_channel("first", "/first", None, &[])).await;
        let second = m.create(http_channel("second", "/second", None, &[])).await;
        m.update(&first, json!({ "priority": 2 })).await;
        m.update(&second, json!({ "priority": 3 })).await;

        let (status, body) = m
            .call(
                "GET",
                &format!("/channels/{}/audits", first.id),
                Some(ROOT_TOKEN),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let audits = body.as_array().cloned().unwrap_or_default();
        assert_eq!(audits.len(), 2);
        let first_id = first.id.to_string();
        assert!(audits.iter().all(|a| a["ref"] == first_id.as_str()));
        assert_eq!(audits[0]["ops"][0]["path"], "/priority");
    }

    #[tokio::test]
    async fn test_audits_require_privilege() {
        let m = Mediator::new();
        let (shared, _) = seed_visibility(&m).await;

        let (status, _) = m
            .call(
                "GET",
                &format!("/channels/{shared}/audits"),
                Some(VIEWER_TOKEN),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    // =========================================================================
    // MANUAL TRIGGER
    // =========================================================================

    #[tokio::test]
    async fn test_trigger_dispatches_to_primary_route() {
        let m = Mediator::new();
        let (shared, hidden) = seed_visibility(&m).await;
        let mut dispatch = m.subscribe(vec![EventTopic::Dispatch]);

        let (status, body) = m
            .call(
                "POST",
                &format!("/channels/{shared}/trigger"),
                Some(VIEWER_TOKEN),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["route"], "test route");
        assert!(matches!(
            dispatch.try_recv(),
            Ok(Some(MediatorEvent::ChannelTriggered { .. }))
        ));

        let (status, _) = m
            .call(
                "POST",
                &format!("/channels/{hidden}/trigger"),
                Some(VIEWER_TOKEN),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
