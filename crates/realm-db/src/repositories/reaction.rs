//! PostgreSQL implementation of ReactionRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use realm_core::entities::{Reaction, ReactionToggle, ReactionType};
use realm_core::error::DomainError;
use realm_core::traits::{ReactionRepository, RepoResult};
use realm_core::value_objects::Snowflake;

use crate::models::ReactionModel;

use super::error::map_db_error;

/// PostgreSQL implementation of ReactionRepository
#[derive(Clone)]
pub struct PgReactionRepository {
    pool: PgPool,
}

impl PgReactionRepository {
    /// Create a new PgReactionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReactionRepository for PgReactionRepository {
    #[instrument(skip(self, reaction), fields(message_id = %reaction.message_id, user_id = %reaction.user_id))]
    async fn toggle(&self, reaction: &Reaction) -> RepoResult<ReactionToggle> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let removed = sqlx::query(
            r"
            DELETE FROM reactions
            WHERE user_id = $1 AND message_id = $2 AND reaction_type = $3
            ",
        )
        .bind(reaction.user_id.into_inner())
        .bind(reaction.message_id.into_inner())
        .bind(reaction.reaction_type.token())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let outcome = if removed.rows_affected() > 0 {
            ReactionToggle::Removed
        } else {
            // A concurrent identical toggle may win the insert; the unique key
            // keeps a single row and this toggle reports it as present
            sqlx::query(
                r"
                INSERT INTO reactions (id, user_id, message_id, reaction_type, created_at)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (user_id, message_id, reaction_type) DO NOTHING
                ",
            )
            .bind(reaction.id.into_inner())
            .bind(reaction.user_id.into_inner())
            .bind(reaction.message_id.into_inner())
            .bind(reaction.reaction_type.token())
            .bind(reaction.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                let is_fk_violation = e
                    .as_database_error()
                    .is_some_and(|db_err| db_err.is_foreign_key_violation());
                if is_fk_violation {
                    DomainError::MessageNotFound(reaction.message_id)
                } else {
                    map_db_error(e)
                }
            })?;
            ReactionToggle::Added
        };

        tx.commit().await.map_err(map_db_error)?;

        Ok(outcome)
    }

    #[instrument(skip(self))]
    async fn find_by_messages(&self, message_ids: &[Snowflake]) -> RepoResult<Vec<Reaction>> {
        if message_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = message_ids.iter().map(|id| id.into_inner()).collect();

        let results = sqlx::query_as::<_, ReactionModel>(
            r"
            SELECT id, user_id, message_id, reaction_type, created_at
            FROM reactions
            WHERE message_id = ANY($1)
            ORDER BY created_at, id
            ",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(Reaction::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn count(&self, message_id: Snowflake, reaction_type: ReactionType) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM reactions WHERE message_id = $1 AND reaction_type = $2",
        )
        .bind(message_id.into_inner())
        .bind(reaction_type.token())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }
}
