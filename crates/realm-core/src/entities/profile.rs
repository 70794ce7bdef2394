//! Profile entity - character profile owned by the identity provider

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Username shown when a message author has no profile
pub const UNKNOWN_USERNAME: &str = "Unknown";

/// Character profile used to enrich messages and member lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Snowflake,
    pub username: String,
    pub avatar_url: Option<String>,
    pub character_class: Option<String>,
    pub bio: Option<String>,
    pub subscription_tier: Option<String>,
}

impl Profile {
    pub fn new(id: Snowflake, username: String) -> Self {
        Self {
            id,
            username,
            avatar_url: None,
            character_class: None,
            bio: None,
            subscription_tier: None,
        }
    }
}

/// Display fields attached to messages and members
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSnippet {
    pub username: String,
    pub avatar_url: Option<String>,
    pub character_class: Option<String>,
}

impl ProfileSnippet {
    /// Snippet for an author without a profile row
    pub fn unknown() -> Self {
        Self {
            username: UNKNOWN_USERNAME.to_string(),
            avatar_url: None,
            character_class: None,
        }
    }
}

impl From<&Profile> for ProfileSnippet {
    fn from(profile: &Profile) -> Self {
        Self {
            username: profile.username.clone(),
            avatar_url: profile.avatar_url.clone(),
            character_class: profile.character_class.clone(),
        }
    }
}
