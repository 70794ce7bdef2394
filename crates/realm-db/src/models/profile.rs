//! Profile database model

use sqlx::FromRow;

/// Database model for profiles table
#[derive(Debug, Clone, FromRow)]
pub struct ProfileModel {
    pub id: i64,
    pub username: String,
    pub avatar_url: Option<String>,
    pub character_class: Option<String>,
    pub bio: Option<String>,
    pub subscription_tier: Option<String>,
}
