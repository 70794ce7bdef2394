//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::access::AccessDenial;
use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    /// Missing, or hidden from a non-member of a private/unlisted channel
    #[error("Channel not found")]
    ChannelNotFound(Snowflake),

    #[error("Message not found")]
    MessageNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("{0}")]
    ValidationError(String),

    #[error("Invalid role")]
    InvalidRole(String),

    #[error("Invalid reaction type")]
    InvalidReactionType(String),

    #[error("Parent message must belong to the same channel")]
    ParentNotInChannel,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Access denied")]
    InsufficientRole,

    // =========================================================================
    // Membership Rule Violations
    // =========================================================================
    #[error("Cannot join private channels directly")]
    ChannelNotJoinable,

    #[error("Already a member of this channel")]
    AlreadyMember,

    #[error("Not a member of this channel")]
    NotAMember,

    #[error("User is not a member of this channel")]
    TargetNotMember,

    #[error("Admins cannot leave channels. Delete the channel instead.")]
    AdminCannotLeave,

    #[error("Cannot remove admins from channel")]
    AdminImmune,

    #[error("Cannot remove yourself from channel. Leave instead.")]
    CannotRemoveSelf,

    #[error("Admins cannot change their own role")]
    CannotChangeOwnRole,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Channel name already taken: {0}")]
    ChannelNameTaken(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The backing schema does not exist yet (tables not migrated)
    #[error("Storage schema not provisioned: {0}")]
    SchemaNotProvisioned(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::ChannelNotFound(_) => "UNKNOWN_CHANNEL",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",

            // Validation
            Self::ValidationError(_) => "VALIDATION_FAILED",
            Self::InvalidRole(_) => "INVALID_ROLE",
            Self::InvalidReactionType(_) => "INVALID_REACTION_TYPE",
            Self::ParentNotInChannel => "INVALID_PARENT",

            // Authorization
            Self::InsufficientRole => "FORBIDDEN",

            // Membership rules
            Self::ChannelNotJoinable => "CHANNEL_NOT_JOINABLE",
            Self::AlreadyMember => "ALREADY_MEMBER",
            Self::NotAMember => "NOT_A_MEMBER",
            Self::TargetNotMember => "TARGET_NOT_MEMBER",
            Self::AdminCannotLeave => "ADMIN_CANNOT_LEAVE",
            Self::AdminImmune => "ADMIN_IMMUNE",
            Self::CannotRemoveSelf => "CANNOT_REMOVE_SELF",
            Self::CannotChangeOwnRole => "CANNOT_CHANGE_OWN_ROLE",

            // Conflict
            Self::ChannelNameTaken(_) => "CHANNEL_NAME_TAKEN",

            // Infrastructure
            Self::StorageUnavailable(_) => "STORAGE_UNAVAILABLE",
            Self::SchemaNotProvisioned(_) => "SCHEMA_NOT_PROVISIONED",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ChannelNotFound(_) | Self::MessageNotFound(_))
    }

    /// Check if this is a validation error (malformed input or a violated membership rule)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidRole(_)
                | Self::InvalidReactionType(_)
                | Self::ParentNotInChannel
                | Self::ChannelNotJoinable
                | Self::AlreadyMember
                | Self::NotAMember
                | Self::TargetNotMember
                | Self::AdminCannotLeave
                | Self::AdminImmune
                | Self::CannotRemoveSelf
                | Self::CannotChangeOwnRole
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::InsufficientRole)
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::ChannelNameTaken(_))
    }

    /// Check if the backing store failed (reachable or not)
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(
            self,
            Self::StorageUnavailable(_) | Self::SchemaNotProvisioned(_)
        )
    }

    /// Check if the store reported a missing schema; read paths may degrade on this
    pub fn is_schema_not_provisioned(&self) -> bool {
        matches!(self, Self::SchemaNotProvisioned(_))
    }

    /// Build a validation error from a static reason
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::ValidationError(reason.into())
    }
}

impl From<AccessDenial> for DomainError {
    fn from(denial: AccessDenial) -> Self {
        match denial {
            AccessDenial::ChannelHidden(channel_id) => Self::ChannelNotFound(channel_id),
            AccessDenial::InsufficientRole => Self::InsufficientRole,
            AccessDenial::NotMember => Self::NotAMember,
            AccessDenial::TargetNotMember => Self::TargetNotMember,
            AccessDenial::SelfRoleChange => Self::CannotChangeOwnRole,
            AccessDenial::SelfRemoval => Self::CannotRemoveSelf,
            AccessDenial::AdminImmune => Self::AdminImmune,
            AccessDenial::AdminCannotLeave => Self::AdminCannotLeave,
            AccessDenial::NotJoinable => Self::ChannelNotJoinable,
            AccessDenial::AlreadyMember => Self::AlreadyMember,
        }
    }
}
