//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use realm_core::entities::{ChannelPrivacy, MemberRole, MessageType, ReactionType};
use realm_core::{MessageNode, Snowflake};
use serde::Serialize;

// ============================================================================
// Common Response Types
// ============================================================================

/// Plain acknowledgement, e.g. `{"message": "Channel deleted successfully"}`
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub message: String,
}

impl StatusResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Channel Responses
// ============================================================================

/// Channel with its member count
#[derive(Debug, Clone, Serialize)]
pub struct ChannelResponse {
    pub id: Snowflake,
    pub name: String,
    pub description: Option<String>,
    pub privacy: ChannelPrivacy,
    pub creator_id: Option<Snowflake>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub member_count: i64,
}

/// Channel detail as seen by the requester
#[derive(Debug, Clone, Serialize)]
pub struct ChannelDetailResponse {
    #[serde(flatten)]
    pub channel: ChannelResponse,
    pub is_member: bool,
    pub user_role: Option<MemberRole>,
    pub creator_username: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChannelListResponse {
    pub channels: Vec<ChannelResponse>,
}

// ============================================================================
// Member Responses
// ============================================================================

/// Membership record returned by join and role changes
#[derive(Debug, Clone, Serialize)]
pub struct MembershipResponse {
    pub channel_id: Snowflake,
    pub user_id: Snowflake,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
}

/// Member with display fields
#[derive(Debug, Clone, Serialize)]
pub struct MemberResponse {
    pub user_id: Snowflake,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
    pub username: String,
    pub avatar_url: Option<String>,
    pub character_class: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberListResponse {
    pub members: Vec<MemberResponse>,
}

// ============================================================================
// Message Responses
// ============================================================================

/// Reaction attached to a message
#[derive(Debug, Clone, Serialize)]
pub struct ReactionResponse {
    pub id: Snowflake,
    pub user_id: Snowflake,
    pub message_id: Snowflake,
    pub reaction_type: ReactionType,
    pub created_at: DateTime<Utc>,
}

/// Message enriched with author display fields and reactions
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    pub user_id: Option<Snowflake>,
    pub content: String,
    pub message_type: MessageType,
    pub parent_id: Option<Snowflake>,
    pub created_at: DateTime<Utc>,
    pub username: String,
    pub avatar_url: Option<String>,
    pub character_class: Option<String>,
    pub reactions: Vec<ReactionResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageListResponse {
    pub messages: Vec<MessageResponse>,
}

/// Message window assembled into reply trees
#[derive(Debug, Clone, Serialize)]
pub struct ThreadResponse {
    pub threads: Vec<MessageNode<MessageResponse>>,
}

/// Outcome of a reaction toggle
#[derive(Debug, Clone, Serialize)]
pub struct ReactionToggleResponse {
    pub message_id: Snowflake,
    pub reaction_type: ReactionType,
    pub added: bool,
    /// Reactions of this type on the message after the toggle
    pub count: i64,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Liveness body for `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy",
            timestamp: Utc::now(),
        }
    }
}

/// Outcome of probing one backing service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Healthy,
    Unhealthy,
}

impl From<bool> for ProbeStatus {
    fn from(ok: bool) -> Self {
        if ok {
            Self::Healthy
        } else {
            Self::Unhealthy
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: ProbeStatus,
    pub redis: ProbeStatus,
}

/// Readiness body for `GET /health/ready`; `status` is `ready` only when
/// every probe passed
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

impl ReadinessResponse {
    pub fn from_checks(checks: HealthChecks) -> Self {
        let ready = checks.database == ProbeStatus::Healthy && checks.redis == ProbeStatus::Healthy;
        Self {
            status: if ready { "ready" } else { "not_ready" },
            timestamp: Utc::now(),
            checks,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
