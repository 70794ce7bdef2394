//! Domain events - events emitted when domain state changes
//!
//! These events are used for:
//! - Fanning new messages out to channel subscribers
//! - Signalling channel list changes to every connected client

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::ReactionType;
use crate::value_objects::Snowflake;

/// Coalesced signal telling clients to refetch their channel list
pub const CHANNELS_REFRESH: &str = "CHANNELS_REFRESH";

/// Event type names that describe channel list changes
pub const CONTROL_PLANE_EVENTS: [&str; 3] = ["CHANNEL_CREATE", "CHANNEL_UPDATE", "CHANNEL_DELETE"];

/// True when an event type changes the channel list rather than a conversation
pub fn is_control_plane(event_type: &str) -> bool {
    CONTROL_PLANE_EVENTS.contains(&event_type)
}

/// All possible domain events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainEvent {
    // =========================================================================
    // Conversation Events (delivered on the channel topic)
    // =========================================================================
    MessageCreated(MessageCreatedEvent),
    ReactionToggled(ReactionToggledEvent),

    // =========================================================================
    // Control-plane Events (delivered on the broadcast topic)
    // =========================================================================
    ChannelCreated(ChannelChangedEvent),
    ChannelUpdated(ChannelChangedEvent),
    ChannelDeleted(ChannelChangedEvent),
}

impl DomainEvent {
    /// Get the event type name, as dispatched to gateway clients
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::MessageCreated(_) => "MESSAGE_CREATE",
            Self::ReactionToggled(_) => "REACTION_TOGGLE",
            Self::ChannelCreated(_) => "CHANNEL_CREATE",
            Self::ChannelUpdated(_) => "CHANNEL_UPDATE",
            Self::ChannelDeleted(_) => "CHANNEL_DELETE",
        }
    }

    /// Get the timestamp of the event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::MessageCreated(e) => e.timestamp,
            Self::ReactionToggled(e) => e.timestamp,
            Self::ChannelCreated(e) | Self::ChannelUpdated(e) | Self::ChannelDeleted(e) => {
                e.timestamp
            }
        }
    }

    /// The channel the event concerns
    pub fn channel_id(&self) -> Snowflake {
        match self {
            Self::MessageCreated(e) => e.channel_id,
            Self::ReactionToggled(e) => e.channel_id,
            Self::ChannelCreated(e) | Self::ChannelUpdated(e) | Self::ChannelDeleted(e) => {
                e.channel_id
            }
        }
    }

    /// Whether this event goes to every client instead of one channel's subscribers
    pub fn is_control_plane(&self) -> bool {
        is_control_plane(self.event_type())
    }
}

// ============================================================================
// Event Structs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageCreatedEvent {
    pub message_id: Snowflake,
    pub channel_id: Snowflake,
    pub author_id: Option<Snowflake>,
    pub parent_id: Option<Snowflake>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionToggledEvent {
    pub message_id: Snowflake,
    pub channel_id: Snowflake,
    pub user_id: Snowflake,
    pub reaction_type: ReactionType,
    pub added: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelChangedEvent {
    pub channel_id: Snowflake,
    pub actor_id: Option<Snowflake>,
    pub timestamp: DateTime<Utc>,
}

impl ChannelChangedEvent {
    pub fn new(channel_id: Snowflake, actor_id: Option<Snowflake>) -> Self {
        Self {
            channel_id,
            actor_id,
            timestamp: Utc::now(),
        }
    }
}
