//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Adapters must surface every storage failure
//! to the caller; degrading to empty results is an API-layer decision.

use async_trait::async_trait;

use crate::entities::{
    Channel, ChannelMembership, ChannelSummary, MemberRole, Message, Profile, ProfileSnippet,
    Reaction, ReactionToggle, ReactionType,
};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Channel Repository
// ============================================================================

#[async_trait]
pub trait ChannelRepository: Send + Sync {
    /// Find channel by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Channel>>;

    /// Find channel by its unique name
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Channel>>;

    /// Public channels plus the user's member channels, de-duplicated by id,
    /// each with its member count
    async fn list_visible(&self, for_user: Option<Snowflake>) -> RepoResult<Vec<ChannelSummary>>;

    /// Create a channel; a creator is enrolled as admin in the same transaction
    async fn create(&self, channel: &Channel) -> RepoResult<()>;

    /// Update name, description and privacy
    async fn update(&self, channel: &Channel) -> RepoResult<()>;

    /// Delete a channel, cascading its memberships, messages and reactions
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    /// Insert a system-seeded channel unless one with the same name exists;
    /// returns the stored row either way
    async fn upsert_by_name(&self, channel: &Channel) -> RepoResult<Channel>;

    /// Get member count for a channel
    async fn member_count(&self, channel_id: Snowflake) -> RepoResult<i64>;
}

// ============================================================================
// Membership Repository
// ============================================================================

/// Membership row joined with the member's display fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMember {
    pub membership: ChannelMembership,
    pub profile: ProfileSnippet,
}

#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Find a user's membership in a channel
    async fn find(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<ChannelMembership>>;

    /// List members ordered by `joined_at` ascending
    async fn list_with_profiles(&self, channel_id: Snowflake) -> RepoResult<Vec<ChannelMember>>;

    /// Add a membership; a duplicate surfaces as [`DomainError::AlreadyMember`]
    async fn create(&self, membership: &ChannelMembership) -> RepoResult<()>;

    /// Change a member's role
    async fn update_role(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
        role: MemberRole,
    ) -> RepoResult<()>;

    /// Remove a membership; returns whether a row existed
    async fn delete(&self, channel_id: Snowflake, user_id: Snowflake) -> RepoResult<bool>;
}

// ============================================================================
// Message Repository
// ============================================================================

/// Default and maximum page size for message queries
pub const MESSAGE_PAGE_LIMIT: i64 = 50;

/// Window options for message queries
#[derive(Debug, Clone, Copy)]
pub struct MessageQuery {
    /// Only messages strictly after this one in `(created_at, id)` order
    pub since: Option<Snowflake>,
    pub limit: i64,
}

impl Default for MessageQuery {
    fn default() -> Self {
        Self {
            since: None,
            limit: MESSAGE_PAGE_LIMIT,
        }
    }
}

impl MessageQuery {
    /// Build a query, clamping the limit to `1..=MESSAGE_PAGE_LIMIT`
    pub fn new(since: Option<Snowflake>, limit: Option<i64>) -> Self {
        Self {
            since,
            limit: limit.unwrap_or(MESSAGE_PAGE_LIMIT).clamp(1, MESSAGE_PAGE_LIMIT),
        }
    }
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Persist a message atomically and return the canonical stored record
    async fn append(&self, message: &Message) -> RepoResult<Message>;

    /// Find message by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>>;

    /// Messages of a channel in ascending `(created_at, id)` order.
    ///
    /// Without `since` this is the most recent `limit` messages; with `since`
    /// it is the first `limit` messages after that one.
    async fn query(&self, channel_id: Snowflake, query: MessageQuery) -> RepoResult<Vec<Message>>;
}

// ============================================================================
// Reaction Repository
// ============================================================================

#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Remove an identical reaction if present, otherwise insert this one
    async fn toggle(&self, reaction: &Reaction) -> RepoResult<ReactionToggle>;

    /// All reactions on the given messages
    async fn find_by_messages(&self, message_ids: &[Snowflake]) -> RepoResult<Vec<Reaction>>;

    /// Number of reactions of one type on a message
    async fn count(&self, message_id: Snowflake, reaction_type: ReactionType) -> RepoResult<i64>;
}

// ============================================================================
// Profile Repository
// ============================================================================

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Batch lookup; ids without a profile are simply absent
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<Profile>>;

    /// Insert or replace a profile
    async fn upsert(&self, profile: &Profile) -> RepoResult<()>;
}
