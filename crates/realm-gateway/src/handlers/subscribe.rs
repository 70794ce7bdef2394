//! Subscribe (op 3) and Unsubscribe (op 4) handlers

use super::HandlerResult;
use crate::connection::Connection;
use crate::events::{GatewayEventType, SubscribedEvent, UnsubscribedEvent};
use crate::protocol::{ChannelPayload, CloseCode, GatewayMessage};
use crate::server::GatewayState;
use realm_core::Snowflake;
use realm_service::services::access::parse_id;
use realm_service::ServiceError;
use std::sync::Arc;

/// Handles channel subscription requests
pub struct SubscribeHandler;

impl SubscribeHandler {
    /// Subscribe the connection to a channel it can read.
    ///
    /// A refused subscription is answered with `UNSUBSCRIBED`; the socket stays open.
    pub async fn subscribe(
        state: &GatewayState,
        connection: &Arc<Connection>,
        user_id: Snowflake,
        payload: ChannelPayload,
    ) -> HandlerResult<Option<CloseCode>> {
        let raw_id = payload.raw_channel_id();

        let channel_id = match parse_id(&raw_id, "channel ID") {
            Ok(id) => id,
            Err(e) => {
                Self::refuse(connection, raw_id, &e)?;
                return Ok(None);
            }
        };

        if !connection.begin_subscribe(channel_id) {
            tracing::debug!(
                session_id = %connection.session_id(),
                channel_id = %channel_id,
                "Subscribe already in flight"
            );
            return Ok(None);
        }

        if let Err(e) = state.access().require_read(channel_id, user_id).await {
            connection.cancel_subscribe(channel_id);
            if e.status_code() >= 500 {
                tracing::warn!(channel_id = %channel_id, error = %e, "Subscribe check failed");
            }
            Self::refuse(connection, raw_id, &e)?;
            return Ok(None);
        }

        // Confirm before the first delivery can land in the queue
        connection.send(GatewayMessage::dispatch(
            GatewayEventType::Subscribed,
            serde_json::to_value(SubscribedEvent { channel_id })?,
        ));

        let hub = state.hub();
        let handle = hub.subscribe(channel_id, connection.session_id(), connection.queue());
        connection.track(handle);

        // The socket went away while we were checking access
        if connection.is_closed() {
            if let Some(handle) = connection.untrack(channel_id) {
                hub.unsubscribe(&handle);
            }
        }

        tracing::debug!(
            session_id = %connection.session_id(),
            user_id = %user_id,
            channel_id = %channel_id,
            "Channel subscribed"
        );

        Ok(None)
    }

    /// Stop live delivery for a channel. Unknown or repeated requests are acknowledged too.
    pub fn unsubscribe(
        state: &GatewayState,
        connection: &Arc<Connection>,
        payload: ChannelPayload,
    ) -> HandlerResult<Option<CloseCode>> {
        let raw_id = payload.raw_channel_id();

        if let Ok(channel_id) = parse_id(&raw_id, "channel ID") {
            if let Some(handle) = connection.untrack(channel_id) {
                state.hub().unsubscribe(&handle);
            }
        }

        connection.send(GatewayMessage::dispatch(
            GatewayEventType::Unsubscribed,
            serde_json::to_value(UnsubscribedEvent::requested(raw_id))?,
        ));

        Ok(None)
    }

    fn refuse(connection: &Connection, raw_id: String, error: &ServiceError) -> HandlerResult<()> {
        tracing::debug!(
            session_id = %connection.session_id(),
            channel_id = %raw_id,
            reason = refusal_reason(error),
            "Subscribe refused"
        );

        connection.send(GatewayMessage::dispatch(
            GatewayEventType::Unsubscribed,
            serde_json::to_value(UnsubscribedEvent::refused(raw_id, refusal_reason(error)))?,
        ));
        Ok(())
    }
}

/// Reason code reported for a refused subscription
pub(crate) fn refusal_reason(error: &ServiceError) -> &str {
    error.error_code()
}
