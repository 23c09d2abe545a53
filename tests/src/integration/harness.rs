//! Shared fixtures for the integration scenarios.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use hm_01_channel_registry::ChannelDraft;
use hm_02_channel_lifecycle::ChannelLifecycleApi;
use hm_03_channel_routing::{ChannelRoutingApi, RoutingDecision, RoutingError};
use hm_04_admin_api::{build_router, StaticUser};
use mediator_runtime::container::{MediatorConfig, MediatorContainer};
use serde_json::{json, Value};
use shared_bus::{EventFilter, EventTopic, Subscription};
use shared_types::entities::{Channel, UpdatedBy};
use shared_types::identity::{ClientIdentity, RoleSet};
use shared_types::transaction::TransactionDescriptor;
use tower::ServiceExt;

pub const ROOT_TOKEN: &str = "root-token";
pub const VIEWER_TOKEN: &str = "viewer-token";

/// A fully wired mediator plus its admin router.
pub struct Mediator {
    pub container: MediatorContainer,
    pub router: Router,
}

impl Mediator {
    pub fn new() -> Self {
        let mut config = MediatorConfig::default();
        config.auth.users = vec![
            StaticUser {
                token: ROOT_TOKEN.into(),
                id: "u-root".into(),
                name: "Root".into(),
                groups: vec!["admin".into()],
            },
            StaticUser {
                token: VIEWER_TOKEN.into(),
                id: "u-viewer".into(),
                name: "Viewer".into(),
                groups: vec!["group1".into()],
            },
        ];
        let container = MediatorContainer::new(config).unwrap();
        let router = build_router(
            container.app_state(),
            container.identity.clone(),
            &container.config.api,
        );
        Self { container, router }
    }

    pub fn root() -> UpdatedBy {
        UpdatedBy::new("u-root", "Root")
    }

    /// Drive one request through the admin router.
    pub async fn call(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    /// Create through the lifecycle manager and wait for its notifications.
    pub async fn create(&self, body: Value) -> Channel {
        let draft: ChannelDraft = serde_json::from_value(body).unwrap();
        let committed = self
            .container
            .lifecycle
            .create(draft, Self::root())
            .await
            .unwrap();
        committed.notifications.settled().await;
        committed.value
    }

    pub async fn update(&self, channel: &Channel, body: Value) -> Channel {
        let draft: ChannelDraft = serde_json::from_value(body).unwrap();
        let committed = self
            .container
            .lifecycle
            .update(channel.id, draft, Self::root())
            .await
            .unwrap();
        committed.notifications.settled().await;
        committed.value.after
    }

    pub async fn delete(&self, channel: &Channel) {
        let committed = self
            .container
            .lifecycle
            .delete(channel.id, Self::root())
            .await
            .unwrap();
        committed.notifications.settled().await;
    }

    pub fn subscribe(&self, topics: Vec<EventTopic>) -> Subscription {
        self.container.bus.subscribe(EventFilter::topics(topics))
    }

    /// Route an http transaction for a client holding `roles`.
    pub async fn route(
        &self,
        path: &str,
        client_id: &str,
        roles: &[&str],
    ) -> Result<RoutingDecision, RoutingError> {
        let caller = ClientIdentity::new(client_id, roles.iter().copied().collect::<RoleSet>());
        self.container
            .routing
            .route(&TransactionDescriptor::http(path), Some(&caller))
            .await
    }
}

/// Http channel body with one enabled primary route.
pub fn http_channel(name: &str, pattern: &str, priority: Option<i64>, allow: &[&str]) -> Value {
    let mut body = json!({
        "name": name,
        "urlPattern": pattern,
        "allow": allow,
        "routes": [{ "name": "test route", "host": "localhost", "port": 9876, "primary": true }]
    });
    if let Some(p) = priority {
        body["priority"] = json!(p);
    }
    body
}
