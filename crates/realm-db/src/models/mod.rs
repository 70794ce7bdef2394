//! Database models - SQLx-compatible structs for PostgreSQL tables

mod channel;
mod membership;
mod message;
mod profile;
mod reaction;

pub use channel::{ChannelModel, ChannelSummaryModel};
pub use membership::{MemberProfileModel, MembershipModel};
pub use message::MessageModel;
pub use profile::ProfileModel;
pub use reaction::ReactionModel;
