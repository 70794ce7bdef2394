//! Event payload definitions
//!
//! Defines the data structures for gateway-originated events. Message and
//! reaction payloads are relayed as published by the API and are not retyped.

use realm_core::entities::Profile;
use realm_core::Snowflake;
use serde::{Deserialize, Serialize};

/// Reason attached to an `UNSUBSCRIBED` event for a hidden or deleted channel
pub const UNKNOWN_CHANNEL_REASON: &str = "UNKNOWN_CHANNEL";

/// READY event payload
///
/// Sent after successful Identify.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyEvent {
    /// Gateway protocol version
    pub v: i32,

    /// Current user
    pub user: UserPayload,

    /// Identifier of this connection
    pub session_id: String,
}

impl ReadyEvent {
    pub const PROTOCOL_VERSION: i32 = 1;

    #[must_use]
    pub fn new(user: UserPayload, session_id: impl Into<String>) -> Self {
        Self {
            v: Self::PROTOCOL_VERSION,
            user,
            session_id: session_id.into(),
        }
    }
}

/// User data included in events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPayload {
    pub id: Snowflake,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl UserPayload {
    /// A user without a profile row
    #[must_use]
    pub fn bare(id: Snowflake) -> Self {
        Self {
            id,
            username: None,
            avatar_url: None,
        }
    }
}

impl From<Profile> for UserPayload {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            username: Some(profile.username),
            avatar_url: profile.avatar_url,
        }
    }
}

/// SUBSCRIBED event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscribedEvent {
    pub channel_id: Snowflake,
}

/// UNSUBSCRIBED event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnsubscribedEvent {
    /// Channel id as the client sent it
    pub channel_id: String,
    /// Why the server ended or refused the subscription; absent when the client asked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl UnsubscribedEvent {
    #[must_use]
    pub fn requested(channel_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            reason: None,
        }
    }

    #[must_use]
    pub fn refused(channel_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            reason: Some(reason.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_event_serialization() {
        let mut profile = Profile::new(Snowflake::new(42), "aria".to_string());
        profile.avatar_url = Some("https://cdn/a.png".to_string());

        let ready = ReadyEvent::new(UserPayload::from(profile), "sess-1");
        let json = serde_json::to_value(&ready).unwrap();

        assert_eq!(json["v"], 1);
        assert_eq!(json["user"]["id"], "42");
        assert_eq!(json["user"]["username"], "aria");
        assert_eq!(json["session_id"], "sess-1");
    }

    #[test]
    fn test_bare_user_omits_profile_fields() {
        let json = serde_json::to_value(UserPayload::bare(Snowflake::new(7))).unwrap();
        assert_eq!(json, serde_json::json!({ "id": "7" }));
    }

    #[test]
    fn test_unsubscribed_reason() {
        let json = serde_json::to_value(UnsubscribedEvent::requested("5")).unwrap();
        assert!(json.get("reason").is_none());

        let json =
            serde_json::to_value(UnsubscribedEvent::refused("5", UNKNOWN_CHANNEL_REASON)).unwrap();
        assert_eq!(json["reason"], "UNKNOWN_CHANNEL");
    }
}
