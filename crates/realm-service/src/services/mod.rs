//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

pub mod access;
pub mod channel;
pub mod context;
pub mod error;
pub mod member;
pub mod message;
pub mod reaction;
pub mod sequencer;
pub mod system;

// Re-export all services for convenience
pub use access::AccessService;
pub use channel::ChannelService;
pub use context::ServiceContext;
pub use error::{ServiceError, ServiceResult};
pub use member::MemberService;
pub use message::MessageService;
pub use reaction::ReactionService;
pub use sequencer::{ChannelSequencer, Turn};
pub use system::{welcome_text, SystemService};
