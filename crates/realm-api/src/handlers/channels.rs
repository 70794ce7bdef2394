//! Channel handlers
//!
//! Endpoints for channel management.

use axum::{
    extract::{Path, State},
    Json,
};
use realm_service::dto::{
    ChannelDetailResponse, ChannelListResponse, ChannelResponse, CreateChannelRequest,
    StatusResponse, UpdateChannelRequest,
};
use realm_service::ChannelService;

use super::degrade_on_missing_schema;
use crate::extractors::{AuthUser, ChannelIdPath, JsonBody, OptionalAuthUser};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// List public channels plus the caller's member channels
///
/// GET /channels
pub async fn list_channels(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
) -> ApiResult<Json<ChannelListResponse>> {
    let service = ChannelService::new(state.service_context());
    let channels = degrade_on_missing_schema(
        service.list_channels(auth.user_id()).await,
        "list_channels",
        auth.user_id(),
    )?;
    Ok(Json(ChannelListResponse { channels }))
}

/// Create channel
///
/// POST /channels
pub async fn create_channel(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(request): JsonBody<CreateChannelRequest>,
) -> ApiResult<Created<Json<ChannelResponse>>> {
    let service = ChannelService::new(state.service_context());
    let response = service.create_channel(auth.user_id, request).await?;
    Ok(Created(Json(response)))
}

/// Get channel by ID
///
/// GET /channels/{channel_id}
pub async fn get_channel(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ChannelIdPath>,
) -> ApiResult<Json<ChannelDetailResponse>> {
    let service = ChannelService::new(state.service_context());
    let response = service.get_channel(path.channel_id()?, auth.user_id).await?;
    Ok(Json(response))
}

/// Update channel
///
/// PUT /channels/{channel_id}
pub async fn update_channel(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ChannelIdPath>,
    JsonBody(request): JsonBody<UpdateChannelRequest>,
) -> ApiResult<Json<ChannelResponse>> {
    let service = ChannelService::new(state.service_context());
    let response = service
        .update_channel(path.channel_id()?, auth.user_id, request)
        .await?;
    Ok(Json(response))
}

/// Delete channel
///
/// DELETE /channels/{channel_id}
pub async fn delete_channel(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ChannelIdPath>,
) -> ApiResult<Json<StatusResponse>> {
    let service = ChannelService::new(state.service_context());
    let response = service
        .delete_channel(path.channel_id()?, auth.user_id)
        .await?;
    Ok(Json(response))
}
