//! Repository traits

mod repositories;

pub use repositories::{
    ChannelMember, ChannelRepository, MembershipRepository, MessageQuery, MessageRepository,
    ProfileRepository, ReactionRepository, RepoResult, MESSAGE_PAGE_LIMIT,
};
