//! PostgreSQL implementation of MembershipRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use realm_core::entities::{ChannelMembership, MemberRole};
use realm_core::error::DomainError;
use realm_core::traits::{ChannelMember, MembershipRepository, RepoResult};
use realm_core::value_objects::Snowflake;

use crate::models::{MemberProfileModel, MembershipModel};

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of MembershipRepository
#[derive(Clone)]
pub struct PgMembershipRepository {
    pool: PgPool,
}

impl PgMembershipRepository {
    /// Create a new PgMembershipRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipRepository for PgMembershipRepository {
    #[instrument(skip(self))]
    async fn find(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<ChannelMembership>> {
        let result = sqlx::query_as::<_, MembershipModel>(
            r"
            SELECT channel_id, user_id, role, joined_at
            FROM channel_memberships
            WHERE channel_id = $1 AND user_id = $2
            ",
        )
        .bind(channel_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(ChannelMembership::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_with_profiles(&self, channel_id: Snowflake) -> RepoResult<Vec<ChannelMember>> {
        let results = sqlx::query_as::<_, MemberProfileModel>(
            r"
            SELECT m.channel_id, m.user_id, m.role, m.joined_at,
                   p.username, p.avatar_url, p.character_class
            FROM channel_memberships m
            LEFT JOIN profiles p ON p.id = m.user_id
            WHERE m.channel_id = $1
            ORDER BY m.joined_at, m.user_id
            ",
        )
        .bind(channel_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(ChannelMember::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn create(&self, membership: &ChannelMembership) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO channel_memberships (channel_id, user_id, role, joined_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(membership.channel_id.into_inner())
        .bind(membership.user_id.into_inner())
        .bind(membership.role.as_str())
        .bind(membership.joined_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::AlreadyMember))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_role(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
        role: MemberRole,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE channel_memberships
            SET role = $3
            WHERE channel_id = $1 AND user_id = $2
            ",
        )
        .bind(channel_id.into_inner())
        .bind(user_id.into_inner())
        .bind(role.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::TargetNotMember);
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, channel_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query(
            "DELETE FROM channel_memberships WHERE channel_id = $1 AND user_id = $2",
        )
        .bind(channel_id.into_inner())
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
