//! Member handlers
//!
//! Endpoints for channel membership: listing, self join/leave and moderation.

use axum::{
    extract::{Path, State},
    Json,
};
use realm_service::dto::{
    MemberListResponse, MembershipResponse, StatusResponse, UpdateMemberRoleRequest,
};
use realm_service::MemberService;

use crate::extractors::{AuthUser, ChannelIdPath, ChannelMemberPath, JsonBody};
use crate::response::ApiResult;
use crate::state::AppState;

/// List channel members ordered by join time
///
/// GET /channels/{channel_id}/members
pub async fn list_members(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ChannelIdPath>,
) -> ApiResult<Json<MemberListResponse>> {
    let service = MemberService::new(state.service_context());
    let members = service
        .list_members(path.channel_id()?, auth.user_id)
        .await?;
    Ok(Json(MemberListResponse { members }))
}

/// Join a public channel
///
/// POST /channels/{channel_id}/join
pub async fn join_channel(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ChannelIdPath>,
) -> ApiResult<Json<MembershipResponse>> {
    let service = MemberService::new(state.service_context());
    let membership = service
        .join_channel(path.channel_id()?, auth.user_id)
        .await?;
    Ok(Json(membership))
}

/// Leave a channel
///
/// DELETE /channels/{channel_id}/leave
pub async fn leave_channel(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ChannelIdPath>,
) -> ApiResult<Json<StatusResponse>> {
    let service = MemberService::new(state.service_context());
    let response = service
        .leave_channel(path.channel_id()?, auth.user_id)
        .await?;
    Ok(Json(response))
}

/// Change a member's role
///
/// PUT /channels/{channel_id}/members/{user_id}
pub async fn update_member_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ChannelMemberPath>,
    JsonBody(request): JsonBody<UpdateMemberRoleRequest>,
) -> ApiResult<Json<MembershipResponse>> {
    let service = MemberService::new(state.service_context());
    let membership = service
        .update_member_role(path.channel_id()?, auth.user_id, path.user_id()?, request)
        .await?;
    Ok(Json(membership))
}

/// Remove a member
///
/// DELETE /channels/{channel_id}/members/{user_id}
pub async fn remove_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ChannelMemberPath>,
) -> ApiResult<Json<StatusResponse>> {
    let service = MemberService::new(state.service_context());
    let response = service
        .remove_member(path.channel_id()?, auth.user_id, path.user_id()?)
        .await?;
    Ok(Json(response))
}
