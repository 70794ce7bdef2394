//! Channel entity - a named, privacy-scoped conversation space

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Maximum channel name length (characters, after trimming)
pub const CHANNEL_NAME_MAX_LEN: usize = 50;

/// Maximum channel description length (characters)
pub const CHANNEL_DESCRIPTION_MAX_LEN: usize = 500;

/// Name of the system-seeded channel that receives announcements
pub const GENERAL_CHANNEL_NAME: &str = "General";

/// Channel privacy setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChannelPrivacy {
    /// Listed, readable, writable and joinable by anyone
    #[default]
    Public,
    /// Not listed; membership is invitation-granted only
    Unlisted,
    /// Members only
    Private,
}

impl ChannelPrivacy {
    /// Storage / wire representation
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Unlisted => "unlisted",
            Self::Private => "private",
        }
    }

    /// Parse from the storage / wire representation
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "public" => Some(Self::Public),
            "unlisted" => Some(Self::Unlisted),
            "private" => Some(Self::Private),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_public(self) -> bool {
        matches!(self, Self::Public)
    }
}

impl std::fmt::Display for ChannelPrivacy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Channel entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: Snowflake,
    pub name: String,
    pub description: Option<String>,
    pub privacy: ChannelPrivacy,
    /// `None` for system-seeded channels
    pub creator_id: Option<Snowflake>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Channel {
    /// Create a new user-owned channel
    #[must_use]
    pub fn new(
        id: Snowflake,
        name: String,
        description: Option<String>,
        privacy: ChannelPrivacy,
        creator_id: Snowflake,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            description,
            privacy,
            creator_id: Some(creator_id),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create the system-seeded General channel
    #[must_use]
    pub fn new_general(id: Snowflake) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: GENERAL_CHANNEL_NAME.to_string(),
            description: Some("Main channel for all users".to_string()),
            privacy: ChannelPrivacy::Public,
            creator_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.privacy.is_public()
    }

    #[inline]
    #[must_use]
    pub fn is_system_seeded(&self) -> bool {
        self.creator_id.is_none()
    }

    /// Apply a partial update; absent fields are left untouched
    pub fn apply(&mut self, changes: ChannelChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = Some(description);
        }
        if let Some(privacy) = changes.privacy {
            self.privacy = privacy;
        }
        self.updated_at = Utc::now();
    }
}

/// Partial channel update, already trimmed and validated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub privacy: Option<ChannelPrivacy>,
}

impl ChannelChanges {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.privacy.is_none()
    }
}

/// Channel annotated with its member count, as listed to clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSummary {
    pub channel: Channel,
    pub member_count: i64,
}

/// Validate and normalize a channel name.
///
/// Returns the trimmed name or a human-readable reason.
pub fn normalize_channel_name(raw: &str) -> Result<String, &'static str> {
    let name = raw.trim();
    if name.is_empty() {
        return Err("Channel name is required");
    }
    if name.chars().count() > CHANNEL_NAME_MAX_LEN {
        return Err("Channel name must be 50 characters or less");
    }
    Ok(name.to_string())
}

/// Validate and normalize an optional description; blank collapses to `None`.
pub fn normalize_channel_description(raw: Option<&str>) -> Result<Option<String>, &'static str> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    if raw.chars().count() > CHANNEL_DESCRIPTION_MAX_LEN {
        return Err("Channel description must be 500 characters or less");
    }
    let trimmed = raw.trim();
    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privacy_round_trips_through_str() {
        for privacy in [
            ChannelPrivacy::Public,
            ChannelPrivacy::Unlisted,
            ChannelPrivacy::Private,
        ] {
            assert_eq!(ChannelPrivacy::parse(privacy.as_str()), Some(privacy));
        }
        assert_eq!(ChannelPrivacy::parse("secret"), None);
    }

    #[test]
    fn test_privacy_serde_is_lowercase() {
        let json = serde_json::to_string(&ChannelPrivacy::Unlisted).unwrap();
        assert_eq!(json, "\"unlisted\"");
    }

    #[test]
    fn test_general_channel_is_public_and_system_seeded() {
        let channel = Channel::new_general(Snowflake::new(1));
        assert!(channel.is_public());
        assert!(channel.is_system_seeded());
        assert_eq!(channel.name, GENERAL_CHANNEL_NAME);
    }

    #[test]
    fn test_apply_changes_leaves_missing_fields() {
        let mut channel = Channel::new(
            Snowflake::new(1),
            "ops".to_string(),
            Some("night shift".to_string()),
            ChannelPrivacy::Public,
            Snowflake::new(7),
        );
        channel.apply(ChannelChanges {
            privacy: Some(ChannelPrivacy::Private),
            ..Default::default()
        });
        assert_eq!(channel.name, "ops");
        assert_eq!(channel.description.as_deref(), Some("night shift"));
        assert_eq!(channel.privacy, ChannelPrivacy::Private);
    }

    #[test]
    fn test_normalize_channel_name() {
        assert_eq!(normalize_channel_name("  netrunners ").unwrap(), "netrunners");
        assert_eq!(normalize_channel_name("   "), Err("Channel name is required"));
        let long = "x".repeat(51);
        assert_eq!(
            normalize_channel_name(&long),
            Err("Channel name must be 50 characters or less")
        );
        assert!(normalize_channel_name(&"x".repeat(50)).is_ok());
    }

    #[test]
    fn test_normalize_channel_description() {
        assert_eq!(normalize_channel_description(None).unwrap(), None);
        assert_eq!(normalize_channel_description(Some("  ")).unwrap(), None);
        assert_eq!(
            normalize_channel_description(Some(" hi ")).unwrap().as_deref(),
            Some("hi")
        );
        assert!(normalize_channel_description(Some(&"d".repeat(501))).is_err());
    }
}
