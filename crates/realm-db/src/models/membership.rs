//! Channel membership database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for channel_memberships table
#[derive(Debug, Clone, FromRow)]
pub struct MembershipModel {
    pub channel_id: i64,
    pub user_id: i64,
    /// 'member', 'moderator' or 'admin' (CHECK constraint)
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

/// Membership joined with the member's profile; profile columns are NULL
/// when the identity provider has not mirrored one yet
#[derive(Debug, Clone, FromRow)]
pub struct MemberProfileModel {
    #[sqlx(flatten)]
    pub membership: MembershipModel,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
    pub character_class: Option<String>,
}
