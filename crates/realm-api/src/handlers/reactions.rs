//! Reaction handlers

use axum::{
    extract::{Path, State},
    Json,
};
use realm_service::dto::{ReactionToggleResponse, ToggleReactionRequest};
use realm_service::ReactionService;

use crate::extractors::{AuthUser, JsonBody, MessageIdPath};
use crate::response::ApiResult;
use crate::state::AppState;

/// Toggle one of the fixed reactions on a message
///
/// POST /messages/{message_id}/reactions
pub async fn toggle_reaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<MessageIdPath>,
    JsonBody(request): JsonBody<ToggleReactionRequest>,
) -> ApiResult<Json<ReactionToggleResponse>> {
    let service = ReactionService::new(state.service_context());
    let response = service
        .toggle_reaction(path.message_id()?, auth.user_id, request)
        .await?;
    Ok(Json(response))
}
