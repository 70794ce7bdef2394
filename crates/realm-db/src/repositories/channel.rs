//! PostgreSQL implementation of ChannelRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use realm_core::entities::{Channel, ChannelSummary, MemberRole};
use realm_core::error::DomainError;
use realm_core::traits::{ChannelRepository, RepoResult};
use realm_core::value_objects::Snowflake;

use crate::models::{ChannelModel, ChannelSummaryModel};

use super::error::{map_db_error, map_unique_violation};

const CHANNEL_COLUMNS: &str =
    "c.id, c.name, c.description, c.privacy, c.creator_id, c.created_at, c.updated_at";

/// PostgreSQL implementation of ChannelRepository
#[derive(Clone)]
pub struct PgChannelRepository {
    pool: PgPool,
}

impl PgChannelRepository {
    /// Create a new PgChannelRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChannelRepository for PgChannelRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Channel>> {
        let result = sqlx::query_as::<_, ChannelModel>(&format!(
            "SELECT {CHANNEL_COLUMNS} FROM channels c WHERE c.id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Channel::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Channel>> {
        let result = sqlx::query_as::<_, ChannelModel>(&format!(
            "SELECT {CHANNEL_COLUMNS} FROM channels c WHERE c.name = $1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Channel::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_visible(&self, for_user: Option<Snowflake>) -> RepoResult<Vec<ChannelSummary>> {
        // One scan over channels, so a public channel the user belongs to
        // appears once
        let results = sqlx::query_as::<_, ChannelSummaryModel>(&format!(
            r"
            SELECT {CHANNEL_COLUMNS},
                   (SELECT COUNT(*) FROM channel_memberships m WHERE m.channel_id = c.id)
                       AS member_count
            FROM channels c
            WHERE c.privacy = 'public'
               OR EXISTS (
                   SELECT 1 FROM channel_memberships m
                   WHERE m.channel_id = c.id AND m.user_id = $1
               )
            ORDER BY c.created_at, c.id
            "
        ))
        .bind(for_user.map(Snowflake::into_inner))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(ChannelSummary::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn create(&self, channel: &Channel) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO channels (id, name, description, privacy, creator_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(channel.id.into_inner())
        .bind(&channel.name)
        .bind(&channel.description)
        .bind(channel.privacy.as_str())
        .bind(channel.creator_id.map(Snowflake::into_inner))
        .bind(channel.created_at)
        .bind(channel.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::ChannelNameTaken(channel.name.clone())))?;

        // The creator is enrolled as admin atomically with the channel
        if let Some(creator_id) = channel.creator_id {
            sqlx::query(
                r"
                INSERT INTO channel_memberships (channel_id, user_id, role, joined_at)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(channel.id.into_inner())
            .bind(creator_id.into_inner())
            .bind(MemberRole::Admin.as_str())
            .bind(channel.created_at)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn update(&self, channel: &Channel) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE channels
            SET name = $2, description = $3, privacy = $4, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(channel.id.into_inner())
        .bind(&channel.name)
        .bind(&channel.description)
        .bind(channel.privacy.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::ChannelNameTaken(channel.name.clone())))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ChannelNotFound(channel.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        // Memberships, messages and reactions go with it via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM channels WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ChannelNotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn upsert_by_name(&self, channel: &Channel) -> RepoResult<Channel> {
        // The no-op update makes RETURNING yield the existing row on conflict
        let result = sqlx::query_as::<_, ChannelModel>(
            r"
            INSERT INTO channels AS c (id, name, description, privacy, creator_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (name) DO UPDATE SET name = c.name
            RETURNING c.id, c.name, c.description, c.privacy, c.creator_id, c.created_at, c.updated_at
            ",
        )
        .bind(channel.id.into_inner())
        .bind(&channel.name)
        .bind(&channel.description)
        .bind(channel.privacy.as_str())
        .bind(channel.creator_id.map(Snowflake::into_inner))
        .bind(channel.created_at)
        .bind(channel.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Channel::try_from(result)
    }

    #[instrument(skip(self))]
    async fn member_count(&self, channel_id: Snowflake) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM channel_memberships WHERE channel_id = $1",
        )
        .bind(channel_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }
}
