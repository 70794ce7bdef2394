//! Test fixtures and data generators
//!
//! Provides reusable request bodies and response shapes for integration tests.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data, distinct across test runs
pub fn unique_suffix() -> String {
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() % 1_000_000_000);
    format!("{millis}-{n}")
}

/// Create channel request
#[derive(Debug, Serialize)]
pub struct CreateChannelRequest {
    pub name: String,
    pub description: Option<String>,
    pub privacy: Option<String>,
}

impl CreateChannelRequest {
    pub fn public() -> Self {
        Self::with_privacy("public")
    }

    pub fn private() -> Self {
        Self::with_privacy("private")
    }

    pub fn with_privacy(privacy: &str) -> Self {
        Self {
            name: format!("test-channel-{}", unique_suffix()),
            description: Some("Integration test channel".to_string()),
            privacy: Some(privacy.to_string()),
        }
    }
}

/// Channel response
#[derive(Debug, Deserialize)]
pub struct ChannelResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub privacy: String,
    pub creator_id: Option<String>,
    pub member_count: i64,
}

/// Channel detail response
#[derive(Debug, Deserialize)]
pub struct ChannelDetailResponse {
    pub id: String,
    pub name: String,
    pub privacy: String,
    pub is_member: bool,
    pub user_role: Option<String>,
}

/// Channel list response
#[derive(Debug, Deserialize)]
pub struct ChannelListResponse {
    pub channels: Vec<ChannelResponse>,
}

/// Membership response
#[derive(Debug, Deserialize)]
pub struct MembershipResponse {
    pub channel_id: String,
    pub user_id: String,
    pub role: String,
}

/// Create message request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageRequest {
    pub channel_id: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl CreateMessageRequest {
    pub fn simple(channel_id: &str, content: &str) -> Self {
        Self {
            channel_id: channel_id.to_string(),
            content: content.to_string(),
            parent_id: None,
        }
    }

    pub fn reply(channel_id: &str, content: &str, parent_id: &str) -> Self {
        Self {
            parent_id: Some(parent_id.to_string()),
            ..Self::simple(channel_id, content)
        }
    }
}

/// Reaction attached to a message
#[derive(Debug, Deserialize)]
pub struct ReactionResponse {
    pub user_id: String,
    pub reaction_type: String,
}

/// Message response
#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub id: String,
    pub channel_id: String,
    pub user_id: Option<String>,
    pub content: String,
    pub message_type: String,
    pub parent_id: Option<String>,
    pub username: String,
    pub reactions: Vec<ReactionResponse>,
}

/// Message list response
#[derive(Debug, Deserialize)]
pub struct MessageListResponse {
    pub messages: Vec<MessageResponse>,
}

/// Toggle reaction request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleReactionRequest {
    pub reaction_type: String,
}

impl ToggleReactionRequest {
    pub fn new(reaction_type: &str) -> Self {
        Self {
            reaction_type: reaction_type.to_string(),
        }
    }
}

/// Reaction toggle response
#[derive(Debug, Deserialize)]
pub struct ReactionToggleResponse {
    pub message_id: String,
    pub reaction_type: String,
    pub added: bool,
    pub count: i64,
}
