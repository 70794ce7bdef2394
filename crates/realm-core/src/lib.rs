//! # realm-core
//!
//! Domain layer containing entities, value objects, repository traits, domain events,
//! and the pure engines: access control, slash-command interpretation and thread assembly.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod access;
pub mod command;
pub mod entities;
pub mod error;
pub mod events;
pub mod thread;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use access::{AccessControl, AccessDenial, ManageAction, Requester, TargetMember};
pub use command::{interpret, interpret_with_rng, PreparedMessage};
pub use entities::{
    Channel, ChannelChanges, ChannelMembership, ChannelPrivacy, ChannelSummary, MemberRole,
    Message, MessageType, Profile, ProfileSnippet, Reaction, ReactionToggle, ReactionType,
};
pub use error::DomainError;
pub use events::DomainEvent;
pub use thread::{assemble, MessageNode, Threaded};
pub use traits::{
    ChannelMember, ChannelRepository, MembershipRepository, MessageQuery, MessageRepository,
    ProfileRepository, ReactionRepository, RepoResult,
};
pub use value_objects::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
