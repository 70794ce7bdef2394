//! Message handlers
//!
//! Endpoints for reading message windows and posting messages.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use realm_service::dto::{
    CreateMessageRequest, MessageListQuery, MessageListResponse, MessageResponse, ThreadResponse,
};
use realm_service::MessageService;

use super::degrade_on_missing_schema;
use crate::extractors::{AuthUser, JsonBody};
use crate::response::{ApiError, ApiResult, Created};
use crate::state::AppState;

fn parse_query(
    query: Result<Query<MessageListQuery>, QueryRejection>,
) -> ApiResult<MessageListQuery> {
    query
        .map(|Query(q)| q)
        .map_err(|e| ApiError::invalid_query(e.body_text()))
}

/// Ordered message window for a channel
///
/// GET /messages?channelId=&sinceId=&limit=
pub async fn list_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<MessageListQuery>, QueryRejection>,
) -> ApiResult<Json<MessageListResponse>> {
    let query = parse_query(query)?;
    let service = MessageService::new(state.service_context());
    let messages = degrade_on_missing_schema(
        service.list_messages(auth.user_id, query).await,
        "list_messages",
        Some(auth.user_id),
    )?;
    Ok(Json(MessageListResponse { messages }))
}

/// The same window assembled into reply trees
///
/// GET /messages/thread?channelId=&sinceId=&limit=
pub async fn get_thread(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<MessageListQuery>, QueryRejection>,
) -> ApiResult<Json<ThreadResponse>> {
    let query = parse_query(query)?;
    let service = MessageService::new(state.service_context());
    let threads = service.get_thread(auth.user_id, query).await?;
    Ok(Json(ThreadResponse { threads }))
}

/// Post a message or slash command
///
/// POST /messages
pub async fn create_message(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(request): JsonBody<CreateMessageRequest>,
) -> ApiResult<Created<Json<MessageResponse>>> {
    let service = MessageService::new(state.service_context());
    let response = service.create_message(auth.user_id, request).await?;
    Ok(Created(Json(response)))
}
