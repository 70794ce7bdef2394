//! Message row

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// One row of `messages`. `(channel_id, parent_id)` references
/// `(channel_id, id)`, so a reply can never point across channels.
#[derive(Debug, Clone, FromRow)]
pub struct MessageModel {
    pub id: i64,
    pub channel_id: i64,
    /// NULL for system messages
    pub user_id: Option<i64>,
    pub content: String,
    /// 'text', 'action', 'dice_roll' or 'system'
    pub message_type: String,
    pub parent_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}
