//! Reaction entity - an energy reaction on a message

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Closed set of reaction tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReactionType {
    Energy,
    Code,
    Bot,
    Fire,
    Water,
    Nature,
}

impl ReactionType {
    /// All reaction types in display order
    pub const ALL: [Self; 6] = [
        Self::Energy,
        Self::Code,
        Self::Bot,
        Self::Fire,
        Self::Water,
        Self::Nature,
    ];

    /// The token stored and sent over the wire
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Self::Energy => "⚡",
            Self::Code => "</>",
            Self::Bot => "🤖",
            Self::Fire => "🔥",
            Self::Water => "💧",
            Self::Nature => "🌿",
        }
    }

    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.token() == token)
    }
}

impl std::fmt::Display for ReactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

impl Serialize for ReactionType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.token())
    }
}

impl<'de> Deserialize<'de> for ReactionType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Self::parse(&token)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown reaction type: {token}")))
    }
}

/// Reaction entity, unique per (user, message, type)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub id: Snowflake,
    pub user_id: Snowflake,
    pub message_id: Snowflake,
    pub reaction_type: ReactionType,
    pub created_at: DateTime<Utc>,
}

impl Reaction {
    pub fn new(
        id: Snowflake,
        user_id: Snowflake,
        message_id: Snowflake,
        reaction_type: ReactionType,
    ) -> Self {
        Self {
            id,
            user_id,
            message_id,
            reaction_type,
            created_at: Utc::now(),
        }
    }
}

/// Outcome of a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionToggle {
    Added,
    Removed,
}

impl ReactionToggle {
    #[inline]
    pub fn is_added(self) -> bool {
        matches!(self, Self::Added)
    }
}
