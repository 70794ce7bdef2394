//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in realm-core.
//! Each repository handles database operations for a specific domain entity.

mod channel;
mod error;
mod membership;
mod message;
mod profile;
mod reaction;

pub use channel::PgChannelRepository;
pub use error::map_db_error;
pub use membership::PgMembershipRepository;
pub use message::PgMessageRepository;
pub use profile::PgProfileRepository;
pub use reaction::PgReactionRepository;
