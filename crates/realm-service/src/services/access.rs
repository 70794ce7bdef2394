//! Channel access resolution
//!
//! Loads a channel and the requester's membership, then defers to the pure
//! [`AccessControl`] rules. Every service goes through here so the hidden
//! channel policy (uniform not-found) is applied in one place.

use realm_core::entities::Channel;
use realm_core::{AccessControl, DomainError, Requester, Snowflake, TargetMember};
use tracing::{debug, instrument};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Access service
pub struct AccessService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccessService<'a> {
    /// Create a new AccessService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Load a channel or fail with `UNKNOWN_CHANNEL`
    pub async fn load_channel(&self, channel_id: Snowflake) -> ServiceResult<Channel> {
        self.ctx
            .channel_repo()
            .find_by_id(channel_id)
            .await?
            .ok_or_else(|| DomainError::ChannelNotFound(channel_id).into())
    }

    /// The requester as seen by a channel
    pub async fn requester(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<Requester> {
        let membership = self
            .ctx
            .membership_repo()
            .find(channel_id, user_id)
            .await?;
        Ok(Requester::new(user_id, membership.map(|m| m.role)))
    }

    /// Load a channel and its requester in one call
    pub async fn resolve(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<(Channel, Requester)> {
        let channel = self.load_channel(channel_id).await?;
        let requester = self.requester(channel_id, user_id).await?;
        Ok((channel, requester))
    }

    /// Resolve and require read access
    #[instrument(skip(self))]
    pub async fn require_read(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<(Channel, Requester)> {
        let (channel, requester) = self.resolve(channel_id, user_id).await?;
        AccessControl::check_read(&channel, &requester).map_err(|denial| {
            debug!(?denial, "Read denied");
            ServiceError::from(denial)
        })?;
        Ok((channel, requester))
    }

    /// Resolve and require write access
    #[instrument(skip(self))]
    pub async fn require_write(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<(Channel, Requester)> {
        let (channel, requester) = self.resolve(channel_id, user_id).await?;
        AccessControl::check_write(&channel, &requester).map_err(|denial| {
            debug!(?denial, "Write denied");
            ServiceError::from(denial)
        })?;
        Ok((channel, requester))
    }

    /// The target of a management action, if they are a member
    pub async fn target_member(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<Option<TargetMember>> {
        let membership = self
            .ctx
            .membership_repo()
            .find(channel_id, user_id)
            .await?;
        Ok(membership.map(|m| TargetMember {
            user_id: m.user_id,
            role: m.role,
        }))
    }
}

/// Parse an id supplied by a client as a string
pub fn parse_id(raw: &str, field: &str) -> ServiceResult<Snowflake> {
    raw.trim()
        .parse::<Snowflake>()
        .map_err(|_| ServiceError::validation(format!("Invalid {field}")))
}

/// Parse a required id, reporting `required` when it is absent or blank
pub fn require_id(raw: Option<&str>, field: &str, required: &str) -> ServiceResult<Snowflake> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => parse_id(value, field),
        None => Err(ServiceError::validation(required)),
    }
}
