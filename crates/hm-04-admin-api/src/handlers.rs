//! Channel administration handlers.
//!
//! Privileged callers may do anything. Everyone else may list and read the
//! channels whose `txViewAcl` names one of their groups, trigger those same
//! channels, and nothing more.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use hm_01_channel_registry::{ChannelDraft, ChannelRegistryApi};
use hm_02_channel_lifecycle::ChannelLifecycleApi;
use hm_03_channel_routing::{can_mutate, can_view, ChannelRoutingApi};
use serde::Serialize;
use shared_types::entities::{Channel, ChannelId, Patch};
use shared_types::identity::AdminCaller;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::{AdminApiError, ApiResult};

/// Services the handlers call into.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<dyn ChannelRegistryApi>,
    pub lifecycle: Arc<dyn ChannelLifecycleApi>,
    pub routing: Arc<dyn ChannelRoutingApi>,
}

/// Response body of a delete.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Response body of a manual trigger.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerResponse {
    pub channel_id: ChannelId,
    pub route: String,
}

fn parse_id(raw: &str) -> ApiResult<ChannelId> {
    raw.parse()
        .map_err(|_| AdminApiError::NotFound(format!("Channel not found: {raw}")))
}

fn require_privileged(caller: &AdminCaller, operation: &str) -> ApiResult<()> {
    if can_mutate(caller) {
        Ok(())
    } else {
        info!(caller = %caller.id, operation, "Non-privileged caller denied");
        Err(AdminApiError::forbidden(format!(
            "User {} is not an admin, API access to {operation} denied",
            caller.id
        )))
    }
}

fn parse_draft(body: &Bytes) -> ApiResult<ChannelDraft> {
    Ok(serde_json::from_slice(body)?)
}

pub async fn list_channels(
    State(state): State<AppState>,
    Extension(caller): Extension<AdminCaller>,
) -> ApiResult<Json<Vec<Channel>>> {
    let channels = state.registry.list_channels().await?;
    let visible: Vec<Channel> = channels
        .into_iter()
        .filter(|channel| can_view(&caller, channel))
        .collect();
    Ok(Json(visible))
}

pub async fn get_channel(
    State(state): State<AppState>,
    Extension(caller): Extension<AdminCaller>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<Channel>> {
    let id = parse_id(&raw_id)?;
    let channel = state.registry.get_channel(id).await?;
    if !can_view(&caller, &channel) {
        return Err(AdminApiError::forbidden(format!(
            "User {} is not authorized to view channel {id}",
            caller.id
        )));
    }
    Ok(Json(channel))
}

pub async fn create_channel(
    State(state): State<AppState>,
    Extension(caller): Extension<AdminCaller>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Channel>)> {
    require_privileged(&caller, "addChannel")?;
    let draft = parse_draft(&body)?;
    let committed = state.lifecycle.create(draft, caller.updated_by()).await?;
    debug!(
        channel_id = %committed.value.id,
        planned = ?committed.notifications.planned(),
        "Channel created"
    );
    Ok((StatusCode::CREATED, Json(committed.value)))
}

pub async fn update_channel(
    State(state): State<AppState>,
    Extension(caller): Extension<AdminCaller>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Channel>> {
    require_privileged(&caller, "updateChannel")?;
    let id = parse_id(&raw_id)?;
    let draft = parse_draft(&body)?;
    let committed = state.lifecycle.update(id, draft, caller.updated_by()).await?;
    debug!(
        channel_id = %id,
        planned = ?committed.notifications.planned(),
        "Channel updated"
    );
    Ok(Json(committed.value.after))
}

pub async fn delete_channel(
    State(state): State<AppState>,
    Extension(caller): Extension<AdminCaller>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    require_privileged(&caller, "removeChannel")?;
    let id = parse_id(&raw_id)?;
    let committed = state.lifecycle.delete(id, caller.updated_by()).await?;
    debug!(
        channel_id = %id,
        soft = committed.value.decision.is_soft(),
        "Channel deleted"
    );
    Ok(Json(DeleteResponse {
        message: "The channel was successfully deleted".into(),
    }))
}

pub async fn channel_audits(
    State(state): State<AppState>,
    Extension(caller): Extension<AdminCaller>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<Vec<Patch>>> {
    require_privileged(&caller, "getChannelAudits")?;
    // An id that cannot exist has no history.
    let Ok(id) = raw_id.parse::<ChannelId>() else {
        return Ok(Json(Vec::new()));
    };
    Ok(Json(state.registry.channel_audits(id).await?))
}

pub async fn trigger_channel(
    State(state): State<AppState>,
    Extension(caller): Extension<AdminCaller>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<TriggerResponse>> {
    let id = parse_id(&raw_id)?;
    let decision = state.routing.trigger(id, &caller).await?;
    Ok(Json(TriggerResponse {
        channel_id: decision.channel_id,
        route: decision.route.name,
    }))
}
