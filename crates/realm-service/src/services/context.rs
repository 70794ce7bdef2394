//! Dependency container shared by every service
//!
//! One context per process. The API and the gateway both build theirs with
//! [`ServiceContext::connect`], so they see the same store and the same topics.

use std::sync::Arc;

use realm_cache::{Publisher, RedisPool, RedisPoolConfig, SharedRedisPool};
use realm_common::{AppConfig, AppError, JwtService};
use realm_core::traits::{
    ChannelRepository, MembershipRepository, MessageRepository, ProfileRepository,
    ReactionRepository,
};
use realm_core::{DomainEvent, Snowflake, SnowflakeGenerator};
use realm_db::{
    PgChannelRepository, PgMembershipRepository, PgMessageRepository, PgPool,
    PgProfileRepository, PgReactionRepository,
};
use serde::Serialize;
use tracing::{info, warn};

use super::sequencer::ChannelSequencer;

#[derive(Clone)]
struct Repositories {
    channels: Arc<dyn ChannelRepository>,
    memberships: Arc<dyn MembershipRepository>,
    messages: Arc<dyn MessageRepository>,
    reactions: Arc<dyn ReactionRepository>,
    profiles: Arc<dyn ProfileRepository>,
}

impl Repositories {
    fn postgres(pool: &PgPool) -> Self {
        Self {
            channels: Arc::new(PgChannelRepository::new(pool.clone())),
            memberships: Arc::new(PgMembershipRepository::new(pool.clone())),
            messages: Arc::new(PgMessageRepository::new(pool.clone())),
            reactions: Arc::new(PgReactionRepository::new(pool.clone())),
            profiles: Arc::new(PgProfileRepository::new(pool.clone())),
        }
    }
}

#[derive(Clone)]
pub struct ServiceContext {
    pool: PgPool,
    redis_pool: SharedRedisPool,
    repos: Repositories,
    publisher: Publisher,
    jwt_service: Arc<JwtService>,
    ids: Arc<SnowflakeGenerator>,
    sequencer: Arc<ChannelSequencer>,
}

impl ServiceContext {
    pub fn new(
        pool: PgPool,
        redis_pool: SharedRedisPool,
        jwt_service: Arc<JwtService>,
        ids: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            repos: Repositories::postgres(&pool),
            publisher: Publisher::new((*redis_pool).clone()),
            pool,
            redis_pool,
            jwt_service,
            ids,
            sequencer: Arc::new(ChannelSequencer::new()),
        }
    }

    /// Open the Postgres pool and the (lazy) Redis pool described by `config`
    ///
    /// # Errors
    /// `AppError::Database` when Postgres is unreachable, `AppError::Cache`
    /// for an unusable Redis URL
    pub async fn connect(config: &AppConfig) -> Result<Self, AppError> {
        let pool = realm_db::create_pool(&realm_db::DatabaseConfig::from(&config.database))
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        info!("PostgreSQL connection established");

        let redis_pool = RedisPool::new(RedisPoolConfig::from(&config.redis))
            .map_err(|e| AppError::Cache(e.to_string()))?;

        Ok(Self::new(
            pool,
            Arc::new(redis_pool),
            Arc::new(JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry)),
            Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id)),
        ))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn redis_pool(&self) -> &SharedRedisPool {
        &self.redis_pool
    }

    pub fn channel_repo(&self) -> &dyn ChannelRepository {
        self.repos.channels.as_ref()
    }

    pub fn membership_repo(&self) -> &dyn MembershipRepository {
        self.repos.memberships.as_ref()
    }

    pub fn message_repo(&self) -> &dyn MessageRepository {
        self.repos.messages.as_ref()
    }

    pub fn reaction_repo(&self) -> &dyn ReactionRepository {
        self.repos.reactions.as_ref()
    }

    pub fn profile_repo(&self) -> &dyn ProfileRepository {
        self.repos.profiles.as_ref()
    }

    /// Fan a committed change out to gateways.
    ///
    /// Delivery is best effort: clients re-query with `sinceId` after a gap,
    /// so a failed publish is logged and swallowed.
    pub async fn publish_event(&self, event: &DomainEvent, data: &impl Serialize) {
        let payload = match serde_json::to_value(data) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(event_type = event.event_type(), error = %e, "Failed to encode event payload");
                return;
            }
        };

        if let Err(e) = self.publisher.publish_domain_event(event, payload).await {
            warn!(
                event_type = event.event_type(),
                channel_id = %event.channel_id(),
                error = %e,
                "Failed to publish event"
            );
        }
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    /// Serializes appends per channel
    pub fn sequencer(&self) -> &ChannelSequencer {
        &self.sequencer
    }

    pub fn generate_id(&self) -> Snowflake {
        self.ids.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool_size", &self.pool.size())
            .field("redis", &self.redis_pool)
            .field("sequenced_channels", &self.sequencer.len())
            .finish_non_exhaustive()
    }
}
