//! Channel entity <-> model mapper

use realm_core::entities::{Channel, ChannelPrivacy, ChannelSummary};
use realm_core::error::DomainError;
use realm_core::value_objects::Snowflake;

use crate::models::{ChannelModel, ChannelSummaryModel};

use super::corrupt_row;

/// Convert ChannelModel to Channel entity, rejecting unknown privacy values
impl TryFrom<ChannelModel> for Channel {
    type Error = DomainError;

    fn try_from(model: ChannelModel) -> Result<Self, Self::Error> {
        let privacy = ChannelPrivacy::parse(&model.privacy)
            .ok_or_else(|| corrupt_row("channels", "privacy", &model.privacy))?;

        Ok(Channel {
            id: Snowflake::new(model.id),
            name: model.name,
            description: model.description,
            privacy,
            creator_id: model.creator_id.map(Snowflake::new),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl TryFrom<ChannelSummaryModel> for ChannelSummary {
    type Error = DomainError;

    fn try_from(model: ChannelSummaryModel) -> Result<Self, Self::Error> {
        Ok(ChannelSummary {
            channel: Channel::try_from(model.channel)?,
            member_count: model.member_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn model(privacy: &str) -> ChannelModel {
        ChannelModel {
            id: 42,
            name: "Night City".to_string(),
            description: None,
            privacy: privacy.to_string(),
            creator_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_channel_from_model() {
        let channel = Channel::try_from(model("unlisted")).unwrap();
        assert_eq!(channel.id, Snowflake::new(42));
        assert_eq!(channel.privacy, ChannelPrivacy::Unlisted);
        assert!(channel.is_system_seeded());
    }

    #[test]
    fn test_unknown_privacy_is_rejected() {
        let err = Channel::try_from(model("secret")).unwrap_err();
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }
}
