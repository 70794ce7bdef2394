//! Event routing
//!
//! Decides where a pub/sub event goes: channel events into the hub,
//! channel list changes into the refresh debouncer.

use crate::connection::ConnectionManager;
use crate::events::{GatewayEventType, UNKNOWN_CHANNEL_REASON};
use crate::hub::Debouncer;
use crate::protocol::GatewayMessage;
use realm_cache::{PubSubChannel, PubSubEvent, ReceivedMessage};
use realm_core::events::is_control_plane;
use realm_core::Snowflake;
use std::sync::Arc;
use std::time::Duration;

const CHANNEL_DELETE: &str = "CHANNEL_DELETE";

/// Start the debouncer that turns channel list changes into `CHANNELS_REFRESH`
pub fn spawn_refresh_debouncer(connections: Arc<ConnectionManager>, delay: Duration) -> Debouncer {
    let (debouncer, _task) = Debouncer::spawn(delay, move || {
        let refresh = GatewayMessage::dispatch(
            GatewayEventType::ChannelsRefresh,
            serde_json::json!({}),
        );
        let sent = connections.broadcast_identified(&refresh);
        tracing::debug!(sent, "Channel list refresh sent");
    });
    debouncer
}

/// Routes received pub/sub events to connections
pub struct EventRouter {
    connections: Arc<ConnectionManager>,
    refresh: Debouncer,
}

impl EventRouter {
    pub fn new(connections: Arc<ConnectionManager>, refresh: Debouncer) -> Self {
        Self {
            connections,
            refresh,
        }
    }

    /// Route one received message
    pub fn route(&self, msg: &ReceivedMessage) {
        let Some(event) = &msg.event else {
            tracing::debug!(channel = %msg.channel, "Received non-event message, ignoring");
            return;
        };

        match msg.channel {
            PubSubChannel::Channel(channel_id) => self.route_channel_event(channel_id, event),
            PubSubChannel::Broadcast => self.route_broadcast_event(event),
        }
    }

    fn route_channel_event(&self, channel_id: Snowflake, event: &PubSubEvent) {
        let message = GatewayMessage::dispatch(event.event_type.clone(), event.data.clone());
        let delivered = self.connections.hub().publish(channel_id, &message);

        tracing::trace!(
            channel_id = %channel_id,
            event_type = %event.event_type,
            delivered,
            "Event dispatched to channel"
        );
    }

    fn route_broadcast_event(&self, event: &PubSubEvent) {
        if !is_control_plane(&event.event_type) {
            tracing::debug!(event_type = %event.event_type, "Unexpected broadcast event, ignoring");
            return;
        }

        if event.event_type == CHANNEL_DELETE {
            match deleted_channel_id(event) {
                Some(channel_id) => {
                    self.connections
                        .hub()
                        .evict_channel(channel_id, UNKNOWN_CHANNEL_REASON);
                    self.connections.forget_channel(channel_id);
                }
                None => tracing::warn!(data = %event.data, "CHANNEL_DELETE without a channel id"),
            }
        }

        self.refresh.notify();
    }
}

fn deleted_channel_id(event: &PubSubEvent) -> Option<Snowflake> {
    event.data.get("id")?.as_str()?.parse().ok()
}

impl std::fmt::Debug for EventRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRouter")
            .field("connections", &self.connections)
            .finish_non_exhaustive()
    }
}
