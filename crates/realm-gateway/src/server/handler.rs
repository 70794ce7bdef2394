//! Per-socket session
//!
//! Each upgraded socket runs three tasks: a reader that decodes frames and
//! runs op handlers, a writer that drains the connection's bounded queue, and
//! a watchdog that ends sessions whose heartbeats stop. Whichever finishes
//! first decides the close code.

use crate::connection::{Connection, ConnectionState};
use crate::handlers::MessageDispatcher;
use crate::protocol::{CloseCode, GatewayMessage, HelloPayload};
use crate::server::GatewayState;
use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;

/// Advertised in Hello
const HEARTBEAT_INTERVAL_MS: u64 = 45_000;

/// Two missed intervals
const HEARTBEAT_TIMEOUT: Duration = Duration::from_millis(HEARTBEAT_INTERVAL_MS * 2);

/// Grace period for the writer to flush queued frames and the close frame
const CLOSE_FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

pub async fn gateway_handler(
    State(state): State<GatewayState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| run_session(state, socket))
}

async fn run_session(state: GatewayState, socket: WebSocket) {
    let session_id = uuid::Uuid::new_v4().to_string();
    let connection = state.connection_manager().open(session_id.clone());
    tracing::info!(session_id = %session_id, "WebSocket connection established");

    let (mut sink, stream) = socket.split();

    // Hello goes straight to the socket, ahead of anything queued
    let hello = GatewayMessage::hello(HelloPayload::with_interval(HEARTBEAT_INTERVAL_MS));
    let sent = match hello.to_json() {
        Ok(json) => sink.send(Message::Text(json)).await.is_ok(),
        Err(_) => false,
    };
    if !sent {
        tracing::warn!(session_id = %session_id, "Could not send Hello");
        disconnect(&state, &connection);
        return;
    }

    let mut reader = tokio::spawn(read_frames(state.clone(), Arc::clone(&connection), stream));
    let mut writer = tokio::spawn(write_frames(Arc::clone(&connection), sink));
    let mut watchdog = tokio::spawn(watch_heartbeats(Arc::clone(&connection)));

    let writer_done = tokio::select! {
        code = &mut reader => {
            if let Ok(Some(code)) = code {
                connection.close_with(code);
            }
            false
        }
        _ = &mut watchdog => {
            connection.close_with(CloseCode::SessionTimeout);
            false
        }
        _ = &mut writer => true,
    };

    reader.abort();
    watchdog.abort();
    disconnect(&state, &connection);

    if !writer_done && tokio::time::timeout(CLOSE_FLUSH_TIMEOUT, &mut writer).await.is_err() {
        writer.abort();
    }
}

/// Returns the close code to send, or `None` when the client went away
async fn read_frames(
    state: GatewayState,
    connection: Arc<Connection>,
    mut stream: SplitStream<WebSocket>,
) -> Option<CloseCode> {
    while let Some(frame) = stream.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Binary(_)) => return Some(CloseCode::DecodeError),
            Ok(Message::Ping(_) | Message::Pong(_)) => continue,
            Ok(Message::Close(_)) => {
                tracing::debug!(session_id = %connection.session_id(), "Client closed");
                return None;
            }
            Err(e) => {
                tracing::debug!(
                    session_id = %connection.session_id(),
                    error = %e,
                    "Socket read failed"
                );
                return None;
            }
        };

        if let Err(code) = handle_text(&state, &connection, &text).await {
            return Some(code);
        }
    }
    None
}

/// Sequence numbers are assigned here, in send order
async fn write_frames(connection: Arc<Connection>, mut sink: SplitSink<WebSocket, Message>) {
    let queue = connection.queue();
    while let Some(frame) = queue.pop().await {
        let frame = frame.with_sequence(connection.next_sequence());
        let Ok(json) = frame.to_json() else {
            tracing::error!(frame = %frame, "Outbound frame did not encode");
            continue;
        };
        if sink.send(Message::Text(json)).await.is_err() {
            return;
        }
    }

    // Queue closed: say why, then hang up
    let close = connection.close_code().map(|code| CloseFrame {
        code: code.into(),
        reason: code.reason().into(),
    });
    let _ = sink.send(Message::Close(close)).await;
    let _ = sink.close().await;
}

/// Completes once no heartbeat has arrived for `HEARTBEAT_TIMEOUT`
async fn watch_heartbeats(connection: Arc<Connection>) {
    loop {
        let idle = connection.time_since_heartbeat();
        if idle >= HEARTBEAT_TIMEOUT {
            tracing::info!(
                session_id = %connection.session_id(),
                idle_ms = idle.as_millis(),
                "Heartbeat timeout"
            );
            return;
        }
        tokio::time::sleep(HEARTBEAT_TIMEOUT - idle).await;
    }
}

async fn handle_text(
    state: &GatewayState,
    connection: &Arc<Connection>,
    text: &str,
) -> Result<(), CloseCode> {
    let session_id = connection.session_id();
    let message = GatewayMessage::from_json(text).map_err(|e| {
        tracing::debug!(session_id = %session_id, error = %e, "Undecodable frame");
        CloseCode::DecodeError
    })?;
    tracing::trace!(session_id = %session_id, op = %message.op, "Frame received");

    match MessageDispatcher::dispatch(state, connection, message).await {
        Ok(None) => Ok(()),
        Ok(Some(code)) => Err(code),
        Err(e) => {
            tracing::warn!(session_id = %session_id, error = %e, "Op handler failed");
            Err(e.close_code())
        }
    }
}

fn disconnect(state: &GatewayState, connection: &Arc<Connection>) {
    tracing::info!(
        session_id = %connection.session_id(),
        user_id = ?connection.user_id(),
        subscriptions = connection.subscribed_channels().len(),
        age_ms = connection.age().as_millis(),
        "Connection closed"
    );

    connection.set_state(ConnectionState::Disconnecting);
    state.connection_manager().release(connection);
}
