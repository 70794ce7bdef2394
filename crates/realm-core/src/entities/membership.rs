//! Membership entity - a user's role-bearing association with a channel

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Role a member holds inside a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    #[default]
    Member,
    Moderator,
    Admin,
}

impl MemberRole {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "member" => Some(Self::Member),
            "moderator" => Some(Self::Moderator),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    #[inline]
    #[must_use]
    pub fn is_moderator(self) -> bool {
        matches!(self, Self::Moderator)
    }
}

impl std::fmt::Display for MemberRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Channel membership entity, unique per (channel, user)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMembership {
    pub channel_id: Snowflake,
    pub user_id: Snowflake,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
}

impl ChannelMembership {
    pub fn new(channel_id: Snowflake, user_id: Snowflake, role: MemberRole) -> Self {
        Self {
            channel_id,
            user_id,
            role,
            joined_at: Utc::now(),
        }
    }

    /// The membership a channel creator receives
    pub fn creator(channel_id: Snowflake, user_id: Snowflake) -> Self {
        Self::new(channel_id, user_id, MemberRole::Admin)
    }
}
