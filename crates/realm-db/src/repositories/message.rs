//! PostgreSQL implementation of MessageRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use realm_core::entities::Message;
use realm_core::error::DomainError;
use realm_core::traits::{MessageQuery, MessageRepository, RepoResult};
use realm_core::value_objects::Snowflake;

use crate::mappers::MessageInsert;
use crate::models::MessageModel;

use super::error::map_db_error;

/// PostgreSQL implementation of MessageRepository
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    /// Create a new PgMessageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// A reply whose parent is missing or in another channel trips the composite
/// parent key; anything else is a storage failure
fn map_append_error(e: sqlx::Error, message: &Message) -> DomainError {
    let is_fk_violation = e
        .as_database_error()
        .is_some_and(|db_err| db_err.is_foreign_key_violation());

    match (is_fk_violation, message.parent_id) {
        (true, Some(_)) => DomainError::ParentNotInChannel,
        (true, None) => DomainError::ChannelNotFound(message.channel_id),
        _ => map_db_error(e),
    }
}

impl PgMessageRepository {
    /// Position of a `sinceId` cursor. An unknown cursor, or one from another
    /// channel, is an error rather than an empty window, so a client never
    /// mistakes a bad cursor for being caught up.
    async fn anchor_created_at(
        &self,
        channel_id: Snowflake,
        since: Snowflake,
    ) -> RepoResult<DateTime<Utc>> {
        sqlx::query_scalar::<_, DateTime<Utc>>(
            r"
            SELECT created_at
            FROM messages
            WHERE id = $1 AND channel_id = $2
            ",
        )
        .bind(since.into_inner())
        .bind(channel_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .ok_or(DomainError::MessageNotFound(since))
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self, message), fields(message_id = %message.id, channel_id = %message.channel_id))]
    async fn append(&self, message: &Message) -> RepoResult<Message> {
        let insert = MessageInsert::new(message);

        // created_at never runs behind the channel's newest message, so
        // (created_at, id) order matches append order even if the clock steps back
        let result = sqlx::query_as::<_, MessageModel>(
            r"
            INSERT INTO messages (id, channel_id, user_id, content, message_type, parent_id, created_at)
            SELECT $1, $2, $3, $4, $5, $6,
                   GREATEST($7, (SELECT MAX(created_at) FROM messages WHERE channel_id = $2))
            RETURNING id, channel_id, user_id, content, message_type, parent_id, created_at
            ",
        )
        .bind(insert.id)
        .bind(insert.channel_id)
        .bind(insert.user_id)
        .bind(insert.content)
        .bind(insert.message_type)
        .bind(insert.parent_id)
        .bind(message.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_append_error(e, message))?;

        Message::try_from(result)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>> {
        let result = sqlx::query_as::<_, MessageModel>(
            r"
            SELECT id, channel_id, user_id, content, message_type, parent_id, created_at
            FROM messages
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Message::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn query(&self, channel_id: Snowflake, query: MessageQuery) -> RepoResult<Vec<Message>> {
        let anchor = match query.since {
            Some(since) => Some((self.anchor_created_at(channel_id, since).await?, since)),
            None => None,
        };

        let results = match anchor {
            // Gap fill after reconnect: the first `limit` messages after the cursor
            Some((anchor_created_at, since)) => {
                sqlx::query_as::<_, MessageModel>(
                    r"
                    SELECT id, channel_id, user_id, content, message_type, parent_id, created_at
                    FROM messages
                    WHERE channel_id = $1
                      AND (created_at, id) > ($2, $3)
                    ORDER BY created_at, id
                    LIMIT $4
                    ",
                )
                .bind(channel_id.into_inner())
                .bind(anchor_created_at)
                .bind(since.into_inner())
                .bind(query.limit)
                .fetch_all(&self.pool)
                .await
            }
            // Initial load: the newest `limit` messages, oldest first
            None => {
                sqlx::query_as::<_, MessageModel>(
                    r"
                    SELECT id, channel_id, user_id, content, message_type, parent_id, created_at
                    FROM (
                        SELECT id, channel_id, user_id, content, message_type, parent_id, created_at
                        FROM messages
                        WHERE channel_id = $1
                        ORDER BY created_at DESC, id DESC
                        LIMIT $2
                    ) recent
                    ORDER BY created_at, id
                    ",
                )
                .bind(channel_id.into_inner())
                .bind(query.limit)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(map_db_error)?;

        results.into_iter().map(Message::try_from).collect()
    }
}
