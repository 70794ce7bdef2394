//! Path parameter extractors
//!
//! Snowflake ids arrive as decimal strings; malformed ids are rejected with a
//! 400 before any service is invoked.

use realm_core::Snowflake;
use realm_service::services::access::parse_id;
use serde::Deserialize;

use crate::response::ApiResult;

/// Path parameters with channel_id
#[derive(Debug, Deserialize)]
pub struct ChannelIdPath {
    pub channel_id: String,
}

impl ChannelIdPath {
    /// Parse channel_id as Snowflake
    pub fn channel_id(&self) -> ApiResult<Snowflake> {
        Ok(parse_id(&self.channel_id, "channel ID")?)
    }
}

/// Path parameters with channel_id and user_id
#[derive(Debug, Deserialize)]
pub struct ChannelMemberPath {
    pub channel_id: String,
    pub user_id: String,
}

impl ChannelMemberPath {
    /// Parse channel_id as Snowflake
    pub fn channel_id(&self) -> ApiResult<Snowflake> {
        Ok(parse_id(&self.channel_id, "channel ID")?)
    }

    /// Parse user_id as Snowflake
    pub fn user_id(&self) -> ApiResult<Snowflake> {
        Ok(parse_id(&self.user_id, "user ID")?)
    }
}

/// Path parameters with message_id
#[derive(Debug, Deserialize)]
pub struct MessageIdPath {
    pub message_id: String,
}

impl MessageIdPath {
    /// Parse message_id as Snowflake
    pub fn message_id(&self) -> ApiResult<Snowflake> {
        Ok(parse_id(&self.message_id, "message ID")?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_decimal_ids() {
        let path = ChannelMemberPath {
            channel_id: "175928847299117063".to_string(),
            user_id: "42".to_string(),
        };
        assert_eq!(
            path.channel_id().unwrap(),
            Snowflake::new(175_928_847_299_117_063)
        );
        assert_eq!(path.user_id().unwrap(), Snowflake::new(42));
    }

    #[test]
    fn test_rejects_malformed_ids() {
        let path = ChannelIdPath {
            channel_id: "general".to_string(),
        };
        let err = path.channel_id().unwrap_err();
        assert_eq!(err.to_string(), "Invalid channel ID");
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
    }
}
