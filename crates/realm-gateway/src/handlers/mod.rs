//! Op code handlers
//!
//! Handles incoming WebSocket messages based on their operation code.

mod error;
mod heartbeat;
mod identify;
mod subscribe;

pub use error::{HandlerError, HandlerResult};
pub use heartbeat::HeartbeatHandler;
pub use identify::IdentifyHandler;
pub use subscribe::SubscribeHandler;

use crate::connection::Connection;
use crate::protocol::{CloseCode, GatewayMessage, OpCode, Sender};
use crate::server::GatewayState;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Routes a decoded client frame to its op handler
pub struct MessageDispatcher;

impl MessageDispatcher {
    /// `Ok(Some(code))` asks the socket to close with that code
    pub async fn dispatch(
        state: &GatewayState,
        connection: &Arc<Connection>,
        message: GatewayMessage,
    ) -> HandlerResult<Option<CloseCode>> {
        if message.op.sent_by() == Sender::Server {
            tracing::warn!(
                session_id = %connection.session_id(),
                op = %message.op,
                "Client sent a server-only op"
            );
            return Ok(Some(CloseCode::UnknownOpcode));
        }

        let user_id = connection.user_id();
        if message.op.requires_identify() && user_id.is_none() {
            return Err(HandlerError::NotAuthenticated);
        }

        match (message.op, user_id) {
            (OpCode::Heartbeat, _) => {
                let seq = message.heartbeat_seq().ok_or_else(|| {
                    HandlerError::InvalidPayload("heartbeat data must be an integer or null".into())
                })?;
                HeartbeatHandler::handle(connection, seq)
            }
            (OpCode::Identify, _) => {
                IdentifyHandler::handle(state, connection, payload(&message)?).await
            }
            (OpCode::Subscribe, Some(user_id)) => {
                SubscribeHandler::subscribe(state, connection, user_id, payload(&message)?).await
            }
            (OpCode::Unsubscribe, Some(_)) => {
                SubscribeHandler::unsubscribe(state, connection, payload(&message)?)
            }
            (op, _) => {
                tracing::error!(%op, "Client op fell through dispatch");
                Ok(Some(CloseCode::UnknownOpcode))
            }
        }
    }
}

fn payload<T: DeserializeOwned>(message: &GatewayMessage) -> HandlerResult<T> {
    message
        .decode()
        .ok_or_else(|| HandlerError::InvalidPayload(format!("malformed {} payload", message.op)))
}
