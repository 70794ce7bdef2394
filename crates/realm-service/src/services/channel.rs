//! Channel service
//!
//! Handles channel listing, creation, management, and detail queries.

use realm_core::entities::{
    normalize_channel_description, normalize_channel_name, Channel, ChannelChanges,
    ChannelPrivacy,
};
use realm_core::events::ChannelChangedEvent;
use realm_core::{AccessControl, DomainEvent, ManageAction, Snowflake};
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::{
    ChannelDetailResponse, ChannelResponse, CreateChannelRequest, StatusResponse,
    UpdateChannelRequest,
};

use super::access::AccessService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Channel service
pub struct ChannelService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ChannelService<'a> {
    /// Create a new ChannelService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Public channels plus the user's member channels
    #[instrument(skip(self))]
    pub async fn list_channels(
        &self,
        user_id: Option<Snowflake>,
    ) -> ServiceResult<Vec<ChannelResponse>> {
        let summaries = self.ctx.channel_repo().list_visible(user_id).await?;
        Ok(summaries.into_iter().map(ChannelResponse::from).collect())
    }

    /// Create a channel; the creator becomes its admin
    #[instrument(skip(self, request))]
    pub async fn create_channel(
        &self,
        user_id: Snowflake,
        request: CreateChannelRequest,
    ) -> ServiceResult<ChannelResponse> {
        let name = normalize_channel_name(&request.name).map_err(ServiceError::validation)?;
        request.validate()?;
        let description = normalize_channel_description(request.description.as_deref())
            .map_err(ServiceError::validation)?;
        let privacy = match request.privacy.as_deref() {
            Some(raw) => parse_privacy(raw)?,
            None => ChannelPrivacy::Public,
        };

        let channel = Channel::new(self.ctx.generate_id(), name, description, privacy, user_id);
        self.ctx.channel_repo().create(&channel).await?;

        info!(channel_id = %channel.id, creator_id = %user_id, privacy = privacy.as_str(), "Channel created");

        let response = ChannelResponse::from_channel(&channel, 1);
        self.publish_channel_event(
            DomainEvent::ChannelCreated(ChannelChangedEvent::new(channel.id, Some(user_id))),
            &response,
        )
        .await;

        Ok(response)
    }

    /// Channel detail with the requester's membership
    #[instrument(skip(self))]
    pub async fn get_channel(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<ChannelDetailResponse> {
        let (channel, requester) = AccessService::new(self.ctx)
            .require_read(channel_id, user_id)
            .await?;

        let member_count = self.ctx.channel_repo().member_count(channel_id).await?;
        let creator_username = match channel.creator_id {
            Some(creator_id) => self
                .ctx
                .profile_repo()
                .find_by_ids(&[creator_id])
                .await?
                .into_iter()
                .next()
                .map(|p| p.username),
            None => None,
        };

        Ok(ChannelDetailResponse {
            channel: ChannelResponse::from_channel(&channel, member_count),
            is_member: requester.is_member(),
            user_role: requester.role,
            creator_username,
        })
    }

    /// Update name, description or privacy (admin only)
    #[instrument(skip(self, request))]
    pub async fn update_channel(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
        request: UpdateChannelRequest,
    ) -> ServiceResult<ChannelResponse> {
        let (mut channel, requester) = AccessService::new(self.ctx)
            .resolve(channel_id, user_id)
            .await?;
        AccessControl::check_manage(&channel, &requester, ManageAction::UpdateChannel)?;

        let changes = parse_changes(request)?;
        if !changes.is_empty() {
            channel.apply(changes);
            self.ctx.channel_repo().update(&channel).await?;
            info!(channel_id = %channel_id, actor_id = %user_id, "Channel updated");
        }

        let member_count = self.ctx.channel_repo().member_count(channel_id).await?;
        let response = ChannelResponse::from_channel(&channel, member_count);
        self.publish_channel_event(
            DomainEvent::ChannelUpdated(ChannelChangedEvent::new(channel_id, Some(user_id))),
            &response,
        )
        .await;

        Ok(response)
    }

    /// Delete a channel with its memberships, messages and reactions (admin only)
    #[instrument(skip(self))]
    pub async fn delete_channel(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<StatusResponse> {
        let (channel, requester) = AccessService::new(self.ctx)
            .resolve(channel_id, user_id)
            .await?;
        AccessControl::check_manage(&channel, &requester, ManageAction::DeleteChannel)?;

        {
            // No append may interleave with the cascade
            let _guard = self.ctx.sequencer().acquire(channel_id).await;
            self.ctx.channel_repo().delete(channel_id).await?;
        }
        self.ctx.sequencer().forget(channel_id);

        info!(channel_id = %channel_id, actor_id = %user_id, "Channel deleted");

        self.publish_channel_event(
            DomainEvent::ChannelDeleted(ChannelChangedEvent::new(channel_id, Some(user_id))),
            &serde_json::json!({ "id": channel_id }),
        )
        .await;

        Ok(StatusResponse::new("Channel deleted successfully"))
    }

    async fn publish_channel_event(&self, event: DomainEvent, data: &impl serde::Serialize) {
        self.ctx.publish_event(&event, data).await;
    }
}

fn parse_privacy(raw: &str) -> ServiceResult<ChannelPrivacy> {
    ChannelPrivacy::parse(raw.trim())
        .ok_or_else(|| ServiceError::validation("Invalid privacy setting"))
}

/// Validate an update body into trimmed changes
fn parse_changes(request: UpdateChannelRequest) -> ServiceResult<ChannelChanges> {
    request.validate()?;

    let name = request
        .name
        .as_deref()
        .map(normalize_channel_name)
        .transpose()
        .map_err(ServiceError::validation)?;
    let description = normalize_channel_description(request.description.as_deref())
        .map_err(ServiceError::validation)?;
    let privacy = request.privacy.as_deref().map(parse_privacy).transpose()?;

    Ok(ChannelChanges {
        name,
        description,
        privacy,
    })
}
