//! Channel database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for channels table
#[derive(Debug, Clone, FromRow)]
pub struct ChannelModel {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// 'public', 'unlisted' or 'private' (CHECK constraint)
    pub privacy: String,
    pub creator_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Channel row with an aggregated member count
#[derive(Debug, Clone, FromRow)]
pub struct ChannelSummaryModel {
    #[sqlx(flatten)]
    pub channel: ChannelModel,
    pub member_count: i64,
}
