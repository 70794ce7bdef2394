//! Message entity - an immutable chat record, optionally replying to another message

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Maximum message content length (characters)
pub const MESSAGE_CONTENT_MAX_LEN: usize = 1000;

/// Kind of message, drives client rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    #[default]
    Chat,
    Action,
    DiceRoll,
    System,
    Command,
}

impl MessageType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Action => "action",
            Self::DiceRoll => "dice_roll",
            Self::System => "system",
            Self::Command => "command",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "chat" => Some(Self::Chat),
            "action" => Some(Self::Action),
            "dice_roll" => Some(Self::DiceRoll),
            "system" => Some(Self::System),
            "command" => Some(Self::Command),
            _ => None,
        }
    }

    /// Resolve a client-supplied type for plain (non-slash) input.
    ///
    /// Unknown values fall back to `chat`; human authors cannot post `system`
    /// or `command` records directly.
    #[must_use]
    pub fn from_client(value: Option<&str>) -> Self {
        match value.and_then(Self::parse) {
            Some(Self::Action) => Self::Action,
            Some(Self::DiceRoll) => Self::DiceRoll,
            _ => Self::Chat,
        }
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    /// `None` marks a system message
    pub user_id: Option<Snowflake>,
    pub content: String,
    pub message_type: MessageType,
    pub parent_id: Option<Snowflake>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a message authored by a user
    pub fn new(
        id: Snowflake,
        channel_id: Snowflake,
        user_id: Snowflake,
        content: String,
        message_type: MessageType,
    ) -> Self {
        Self {
            id,
            channel_id,
            user_id: Some(user_id),
            content,
            message_type,
            parent_id: None,
            created_at: Utc::now(),
        }
    }

    /// Create a system message (no human author)
    pub fn new_system(id: Snowflake, channel_id: Snowflake, content: String) -> Self {
        Self {
            id,
            channel_id,
            user_id: None,
            content,
            message_type: MessageType::System,
            parent_id: None,
            created_at: Utc::now(),
        }
    }

    /// Attach a parent for threading
    pub fn with_parent(mut self, parent_id: Option<Snowflake>) -> Self {
        self.parent_id = parent_id;
        self
    }

    #[inline]
    pub fn is_system(&self) -> bool {
        self.user_id.is_none()
    }

    #[inline]
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }

    /// Total ordering key used for storage and delivery order
    #[inline]
    pub fn ordering_key(&self) -> (DateTime<Utc>, Snowflake) {
        (self.created_at, self.id)
    }
}

/// Validate message content and return the trimmed text.
pub fn normalize_message_content(raw: &str) -> Result<String, &'static str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("Message content is required");
    }
    if raw.chars().count() > MESSAGE_CONTENT_MAX_LEN {
        return Err("Message content must be 1000 characters or less");
    }
    Ok(trimmed.to_string())
}
