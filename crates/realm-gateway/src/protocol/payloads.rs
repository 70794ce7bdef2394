//! Client payload definitions
//!
//! Defines the payload structures for client-to-server messages.

use serde::{Deserialize, Serialize};

/// Payload for op 10 (Hello)
///
/// Sent by the server immediately after connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloPayload {
    /// Heartbeat interval in milliseconds
    pub heartbeat_interval: u64,
}

impl HelloPayload {
    /// Default heartbeat interval (45 seconds)
    pub const DEFAULT_HEARTBEAT_INTERVAL: u64 = 45_000;

    /// Create a Hello payload with custom interval
    #[must_use]
    pub fn with_interval(heartbeat_interval: u64) -> Self {
        Self { heartbeat_interval }
    }
}

impl Default for HelloPayload {
    fn default() -> Self {
        Self::with_interval(Self::DEFAULT_HEARTBEAT_INTERVAL)
    }
}

/// Payload for op 2 (Identify)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifyPayload {
    /// Access token, with or without a `Bearer ` prefix
    pub token: String,
}

impl IdentifyPayload {
    /// The raw token
    #[must_use]
    pub fn bearer_token(&self) -> &str {
        self.token.strip_prefix("Bearer ").unwrap_or(&self.token)
    }
}

/// Payload for op 3 (Subscribe) and op 4 (Unsubscribe)
///
/// Ids travel as strings; numbers are accepted too.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelPayload {
    pub channel_id: serde_json::Value,
}

impl ChannelPayload {
    /// The channel id as text, whichever JSON form the client used
    #[must_use]
    pub fn raw_channel_id(&self) -> String {
        match &self.channel_id {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}
