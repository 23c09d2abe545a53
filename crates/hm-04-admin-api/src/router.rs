use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::domain::ApiConfig;
use crate::handlers::{
    channel_audits, create_channel, delete_channel, get_channel, list_channels, trigger_channel,
    update_channel, AppState,
};
use crate::middleware::authenticate;
use crate::ports::IdentityResolver;

/// Build the admin router.
///
/// Layer order, outermost first: trace, timeout, authentication.
pub fn build_router(
    state: AppState,
    identity: Arc<dyn IdentityResolver>,
    config: &ApiConfig,
) -> Router {
    Router::new()
        .route("/channels", get(list_channels).post(create_channel))
        .route(
            "/channels/:id",
            get(get_channel).put(update_channel).delete(delete_channel),
        )
        .route("/channels/:id/audits", get(channel_audits))
        .route("/channels/:id/trigger", post(trigger_channel))
        .layer(middleware::from_fn_with_state(identity, authenticate))
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
