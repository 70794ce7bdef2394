//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use realm_core::entities::{
    Channel, ChannelMembership, ChannelSummary, Message, Profile, ProfileSnippet, Reaction,
};
use realm_core::traits::ChannelMember;
use realm_core::{Snowflake, Threaded};

use super::responses::{
    ChannelResponse, MemberResponse, MembershipResponse, MessageResponse, ReactionResponse,
};

// ============================================================================
// Channel Mappers
// ============================================================================

impl ChannelResponse {
    pub fn from_channel(channel: &Channel, member_count: i64) -> Self {
        Self {
            id: channel.id,
            name: channel.name.clone(),
            description: channel.description.clone(),
            privacy: channel.privacy,
            creator_id: channel.creator_id,
            created_at: channel.created_at,
            updated_at: channel.updated_at,
            member_count,
        }
    }
}

impl From<&ChannelSummary> for ChannelResponse {
    fn from(summary: &ChannelSummary) -> Self {
        Self::from_channel(&summary.channel, summary.member_count)
    }
}

impl From<ChannelSummary> for ChannelResponse {
    fn from(summary: ChannelSummary) -> Self {
        Self::from(&summary)
    }
}

// ============================================================================
// Member Mappers
// ============================================================================

impl From<&ChannelMembership> for MembershipResponse {
    fn from(membership: &ChannelMembership) -> Self {
        Self {
            channel_id: membership.channel_id,
            user_id: membership.user_id,
            role: membership.role,
            joined_at: membership.joined_at,
        }
    }
}

impl From<ChannelMember> for MemberResponse {
    fn from(member: ChannelMember) -> Self {
        let ChannelMember {
            membership,
            profile,
        } = member;
        Self {
            user_id: membership.user_id,
            role: membership.role,
            joined_at: membership.joined_at,
            username: profile.username,
            avatar_url: profile.avatar_url,
            character_class: profile.character_class,
        }
    }
}

// ============================================================================
// Message Mappers
// ============================================================================

impl From<&Reaction> for ReactionResponse {
    fn from(reaction: &Reaction) -> Self {
        Self {
            id: reaction.id,
            user_id: reaction.user_id,
            message_id: reaction.message_id,
            reaction_type: reaction.reaction_type,
            created_at: reaction.created_at,
        }
    }
}

impl MessageResponse {
    /// Attach author display fields and reactions to a stored message.
    ///
    /// Authors without a profile (including system messages) show as "Unknown".
    pub fn enrich(message: Message, author: Option<&Profile>, reactions: &[Reaction]) -> Self {
        let snippet = author.map_or_else(ProfileSnippet::unknown, ProfileSnippet::from);
        Self {
            id: message.id,
            channel_id: message.channel_id,
            user_id: message.user_id,
            content: message.content,
            message_type: message.message_type,
            parent_id: message.parent_id,
            created_at: message.created_at,
            username: snippet.username,
            avatar_url: snippet.avatar_url,
            character_class: snippet.character_class,
            reactions: reactions.iter().map(ReactionResponse::from).collect(),
        }
    }
}

impl Threaded for MessageResponse {
    fn thread_id(&self) -> Snowflake {
        self.id
    }

    fn thread_parent(&self) -> Option<Snowflake> {
        self.parent_id
    }
}
