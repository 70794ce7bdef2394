//! Member service
//!
//! Handles channel membership: listing, joining, leaving, role changes and removal.

use realm_core::entities::{ChannelMembership, MemberRole};
use realm_core::{AccessControl, DomainError, ManageAction, Snowflake};
use tracing::{info, instrument};

use crate::dto::{
    MemberResponse, MembershipResponse, StatusResponse, UpdateMemberRoleRequest,
};

use super::access::AccessService;
use super::context::ServiceContext;
use super::error::ServiceResult;

/// Member service
pub struct MemberService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MemberService<'a> {
    /// Create a new MemberService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Members ordered by join time, with display fields
    #[instrument(skip(self))]
    pub async fn list_members(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<Vec<MemberResponse>> {
        AccessService::new(self.ctx)
            .require_read(channel_id, user_id)
            .await?;

        let members = self
            .ctx
            .membership_repo()
            .list_with_profiles(channel_id)
            .await?;
        Ok(members.into_iter().map(MemberResponse::from).collect())
    }

    /// Join a public channel as a plain member
    #[instrument(skip(self))]
    pub async fn join_channel(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<MembershipResponse> {
        let (channel, requester) = AccessService::new(self.ctx)
            .resolve(channel_id, user_id)
            .await?;
        AccessControl::check_join(&channel, &requester)?;

        let membership = ChannelMembership::new(channel_id, user_id, MemberRole::Member);
        self.ctx.membership_repo().create(&membership).await?;

        info!(channel_id = %channel_id, user_id = %user_id, "Joined channel");

        Ok(MembershipResponse::from(&membership))
    }

    /// Leave a channel; admins must delete it instead
    #[instrument(skip(self))]
    pub async fn leave_channel(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<StatusResponse> {
        let (channel, requester) = AccessService::new(self.ctx)
            .resolve(channel_id, user_id)
            .await?;
        AccessControl::check_leave(&channel, &requester)?;

        if !self.ctx.membership_repo().delete(channel_id, user_id).await? {
            return Err(DomainError::NotAMember.into());
        }

        info!(channel_id = %channel_id, user_id = %user_id, "Left channel");

        Ok(StatusResponse::new("Successfully left channel"))
    }

    /// Change another member's role
    #[instrument(skip(self, request))]
    pub async fn update_member_role(
        &self,
        channel_id: Snowflake,
        actor_id: Snowflake,
        target_id: Snowflake,
        request: UpdateMemberRoleRequest,
    ) -> ServiceResult<MembershipResponse> {
        let new_role = MemberRole::parse(request.role.trim())
            .ok_or_else(|| DomainError::InvalidRole(request.role.clone()))?;

        let access = AccessService::new(self.ctx);
        let (channel, requester) = access.resolve(channel_id, actor_id).await?;
        let target = access.target_member(channel_id, target_id).await?;
        AccessControl::check_manage(
            &channel,
            &requester,
            ManageAction::ChangeRole { target, new_role },
        )?;

        self.ctx
            .membership_repo()
            .update_role(channel_id, target_id, new_role)
            .await?;

        let membership = self
            .ctx
            .membership_repo()
            .find(channel_id, target_id)
            .await?
            .ok_or(DomainError::TargetNotMember)?;

        info!(
            channel_id = %channel_id,
            actor_id = %actor_id,
            target_id = %target_id,
            role = new_role.as_str(),
            "Member role changed"
        );

        Ok(MembershipResponse::from(&membership))
    }

    /// Remove a member from a channel
    #[instrument(skip(self))]
    pub async fn remove_member(
        &self,
        channel_id: Snowflake,
        actor_id: Snowflake,
        target_id: Snowflake,
    ) -> ServiceResult<StatusResponse> {
        let access = AccessService::new(self.ctx);
        let (channel, requester) = access.resolve(channel_id, actor_id).await?;
        let target = access.target_member(channel_id, target_id).await?;
        AccessControl::check_manage(&channel, &requester, ManageAction::RemoveMember { target })?;

        if !self
            .ctx
            .membership_repo()
            .delete(channel_id, target_id)
            .await?
        {
            return Err(DomainError::TargetNotMember.into());
        }

        info!(
            channel_id = %channel_id,
            actor_id = %actor_id,
            target_id = %target_id,
            "Member removed"
        );

        Ok(StatusResponse::new("Member removed successfully"))
    }
}
