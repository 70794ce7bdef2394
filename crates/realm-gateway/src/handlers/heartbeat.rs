//! Heartbeat handler (op 1)

use super::HandlerResult;
use crate::connection::Connection;
use crate::hub::PushOutcome;
use crate::protocol::{CloseCode, GatewayMessage};
use std::sync::Arc;

pub struct HeartbeatHandler;

impl HeartbeatHandler {
    /// Reset the watchdog and acknowledge. `last_sequence` is informational;
    /// frames are never replayed.
    pub fn handle(
        connection: &Arc<Connection>,
        last_sequence: Option<u64>,
    ) -> HandlerResult<Option<CloseCode>> {
        connection.record_heartbeat();

        tracing::trace!(
            session_id = %connection.session_id(),
            client_seq = ?last_sequence,
            server_seq = connection.current_sequence(),
            "Heartbeat received"
        );

        if connection.send(GatewayMessage::heartbeat_ack()) == PushOutcome::Closed {
            tracing::debug!(session_id = %connection.session_id(), "Ack dropped; socket closing");
        }

        Ok(None)
    }
}
