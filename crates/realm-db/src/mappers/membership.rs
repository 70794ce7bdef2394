//! Membership entity <-> model mapper

use realm_core::entities::{ChannelMembership, MemberRole, ProfileSnippet, UNKNOWN_USERNAME};
use realm_core::error::DomainError;
use realm_core::traits::ChannelMember;
use realm_core::value_objects::Snowflake;

use crate::models::{MemberProfileModel, MembershipModel};

use super::corrupt_row;

impl TryFrom<MembershipModel> for ChannelMembership {
    type Error = DomainError;

    fn try_from(model: MembershipModel) -> Result<Self, Self::Error> {
        let role = MemberRole::parse(&model.role)
            .ok_or_else(|| corrupt_row("channel_memberships", "role", &model.role))?;

        Ok(ChannelMembership {
            channel_id: Snowflake::new(model.channel_id),
            user_id: Snowflake::new(model.user_id),
            role,
            joined_at: model.joined_at,
        })
    }
}

impl TryFrom<MemberProfileModel> for ChannelMember {
    type Error = DomainError;

    fn try_from(model: MemberProfileModel) -> Result<Self, Self::Error> {
        Ok(ChannelMember {
            membership: ChannelMembership::try_from(model.membership)?,
            profile: ProfileSnippet {
                username: model
                    .username
                    .unwrap_or_else(|| UNKNOWN_USERNAME.to_string()),
                avatar_url: model.avatar_url,
                character_class: model.character_class,
            },
        })
    }
}
