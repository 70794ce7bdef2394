//! Identify handler (op 2)

use super::{HandlerError, HandlerResult};
use crate::connection::Connection;
use crate::events::{GatewayEventType, ReadyEvent, UserPayload};
use crate::protocol::{CloseCode, GatewayMessage, IdentifyPayload};
use crate::server::GatewayState;
use std::sync::Arc;

pub struct IdentifyHandler;

impl IdentifyHandler {
    /// Bind the socket to the token's user and answer with READY
    pub async fn handle(
        state: &GatewayState,
        connection: &Arc<Connection>,
        payload: IdentifyPayload,
    ) -> HandlerResult<Option<CloseCode>> {
        if connection.is_authenticated() {
            return Err(HandlerError::AlreadyAuthenticated);
        }

        let user_id = state
            .jwt_service()
            .authenticate(payload.bearer_token())
            .map_err(|e| {
                tracing::debug!(
                    session_id = %connection.session_id(),
                    error = %e,
                    "Identify rejected"
                );
                HandlerError::AuthenticationFailed(e)
            })?;

        let session_id = connection.session_id().to_string();
        if !state.connection_manager().bind_user(connection, user_id) {
            return Err(HandlerError::AlreadyAuthenticated);
        }

        // A missing profile row does not block the session
        let user = match state.service_context().profile_repo().find_by_ids(&[user_id]).await {
            Ok(mut profiles) => profiles
                .pop()
                .map_or_else(|| UserPayload::bare(user_id), UserPayload::from),
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "Failed to load profile for READY");
                UserPayload::bare(user_id)
            }
        };

        let ready = ReadyEvent::new(user, session_id.clone());
        connection.send(GatewayMessage::dispatch(
            GatewayEventType::Ready,
            serde_json::to_value(&ready)?,
        ));

        tracing::info!(
            session_id = %session_id,
            user_id = %user_id,
            username = ?ready.user.username,
            "Client identified"
        );

        Ok(None)
    }
}
