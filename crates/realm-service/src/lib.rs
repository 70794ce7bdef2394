//! # realm-service
//!
//! Application layer containing business logic, services, and DTOs.
//!
//! Services borrow a [`ServiceContext`] per request and translate access
//! verdicts, validation failures and storage errors into [`ServiceError`].

pub mod dto;
pub mod services;

pub use services::{
    AccessService, ChannelSequencer, ChannelService, MemberService, MessageService,
    ReactionService, ServiceContext, ServiceError, ServiceResult,
    SystemService,
};
