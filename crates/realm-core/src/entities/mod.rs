//! Domain entities - core business objects

mod channel;
mod membership;
mod message;
mod profile;
mod reaction;

pub use channel::{
    normalize_channel_description, normalize_channel_name, Channel, ChannelChanges,
    ChannelPrivacy, ChannelSummary, CHANNEL_DESCRIPTION_MAX_LEN, CHANNEL_NAME_MAX_LEN,
    GENERAL_CHANNEL_NAME,
};
pub use membership::{ChannelMembership, MemberRole};
pub use message::{normalize_message_content, Message, MessageType, MESSAGE_CONTENT_MAX_LEN};
pub use profile::{Profile, ProfileSnippet, UNKNOWN_USERNAME};
pub use reaction::{Reaction, ReactionToggle, ReactionType};
