//! PostgreSQL implementation of ProfileRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use realm_core::entities::Profile;
use realm_core::traits::{ProfileRepository, RepoResult};
use realm_core::value_objects::Snowflake;

use crate::models::ProfileModel;

use super::error::map_db_error;

/// PostgreSQL implementation of ProfileRepository
#[derive(Clone)]
pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    /// Create a new PgProfileRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    #[instrument(skip(self))]
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<Profile>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = ids.iter().map(|id| id.into_inner()).collect();

        let results = sqlx::query_as::<_, ProfileModel>(
            r"
            SELECT id, username, avatar_url, character_class, bio, subscription_tier
            FROM profiles
            WHERE id = ANY($1)
            ",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Profile::from).collect())
    }

    #[instrument(skip(self, profile), fields(profile_id = %profile.id))]
    async fn upsert(&self, profile: &Profile) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO profiles (id, username, avatar_url, character_class, bio, subscription_tier)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE
            SET username = EXCLUDED.username,
                avatar_url = EXCLUDED.avatar_url,
                character_class = EXCLUDED.character_class,
                bio = EXCLUDED.bio,
                subscription_tier = EXCLUDED.subscription_tier,
                updated_at = NOW()
            ",
        )
        .bind(profile.id.into_inner())
        .bind(&profile.username)
        .bind(&profile.avatar_url)
        .bind(&profile.character_class)
        .bind(&profile.bio)
        .bind(&profile.subscription_tier)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
