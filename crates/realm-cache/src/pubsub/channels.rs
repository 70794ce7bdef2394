//! Pub/Sub topic definitions.
//!
//! Data-plane events travel on one topic per chat channel; control-plane
//! events (channel list changes) travel on a single broadcast topic.

use realm_core::Snowflake;

/// Topic prefix for channel-specific events
pub const CHANNEL_PREFIX: &str = "channel:";
/// Topic for events every connected client may care about
pub const BROADCAST_CHANNEL: &str = "broadcast";

/// Pub/Sub topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PubSubChannel {
    /// Events for a specific chat channel
    Channel(Snowflake),
    /// Control-plane events for all connected clients
    Broadcast,
}

impl PubSubChannel {
    /// Create a channel topic
    #[must_use]
    pub fn channel(channel_id: Snowflake) -> Self {
        Self::Channel(channel_id)
    }

    /// Create the broadcast topic
    #[must_use]
    pub fn broadcast() -> Self {
        Self::Broadcast
    }

    /// Get the Redis topic name
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Channel(id) => format!("{CHANNEL_PREFIX}{id}"),
            Self::Broadcast => BROADCAST_CHANNEL.to_string(),
        }
    }

    /// Parse a topic name back to a `PubSubChannel`; unknown names yield `None`
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        if name == BROADCAST_CHANNEL {
            return Some(Self::Broadcast);
        }

        name.strip_prefix(CHANNEL_PREFIX)
            .and_then(|id| id.parse::<Snowflake>().ok())
            .map(Self::Channel)
    }

    /// The chat channel this topic carries, if any
    #[must_use]
    pub fn channel_id(&self) -> Option<Snowflake> {
        match self {
            Self::Channel(id) => Some(*id),
            Self::Broadcast => None,
        }
    }
}

impl std::fmt::Display for PubSubChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
