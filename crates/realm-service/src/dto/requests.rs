//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize`; bodies with length rules also
//! implement `Validate`. Trimming and emptiness checks happen in the services
//! because they depend on the trimmed value.

use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Channel Requests
// ============================================================================

/// Create channel request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateChannelRequest {
    #[serde(default)]
    pub name: String,

    #[validate(length(max = 500, message = "Channel description must be 500 characters or less"))]
    pub description: Option<String>,

    /// `public` (default), `unlisted` or `private`
    pub privacy: Option<String>,
}

/// Update channel request; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateChannelRequest {
    pub name: Option<String>,

    #[validate(length(max = 500, message = "Channel description must be 500 characters or less"))]
    pub description: Option<String>,

    pub privacy: Option<String>,
}

// ============================================================================
// Member Requests
// ============================================================================

/// Change a member's role
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMemberRoleRequest {
    #[serde(default)]
    pub role: String,
}

// ============================================================================
// Message Requests
// ============================================================================

/// Query string of `GET /messages` and `GET /messages/thread`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageListQuery {
    pub channel_id: Option<String>,
    pub since_id: Option<String>,
    pub limit: Option<i64>,
}

/// Create message request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageRequest {
    pub channel_id: Option<String>,

    #[serde(default)]
    #[validate(length(max = 1000, message = "Message content must be 1000 characters or less"))]
    pub content: String,

    /// Honoured for plain input only
    pub message_type: Option<String>,

    pub parent_id: Option<String>,
}

// ============================================================================
// Reaction Requests
// ============================================================================

/// Toggle a reaction on a message
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleReactionRequest {
    #[serde(default)]
    pub reaction_type: String,
}
