//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    CreateChannelRequest, CreateMessageRequest, MessageListQuery, ToggleReactionRequest,
    UpdateChannelRequest, UpdateMemberRoleRequest,
};

pub use responses::{
    ChannelDetailResponse, ChannelListResponse, ChannelResponse, HealthChecks, HealthResponse,
    MemberListResponse, MemberResponse, MembershipResponse, MessageListResponse, MessageResponse,
    ProbeStatus, ReactionResponse, ReactionToggleResponse, ReadinessResponse, StatusResponse,
    ThreadResponse,
};
