//! System service
//!
//! The automated persona: seeds the General channel and posts system messages
//! into it. System messages have no author and are delivered like any other.

use realm_core::entities::{normalize_message_content, Channel, GENERAL_CHANNEL_NAME};
use realm_core::{Message, Snowflake};
use tracing::{info, instrument};

use crate::dto::MessageResponse;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::message::MessageService;

/// Greeting posted for a newcomer
pub fn welcome_text(username: Option<&str>) -> String {
    let name = username
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("traveler");
    format!(
        "A new signal detected. The Architect acknowledges you, {name}. Your story begins now."
    )
}

/// System service
pub struct SystemService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SystemService<'a> {
    /// Create a new SystemService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Make sure the public General channel exists; returns it either way
    #[instrument(skip(self))]
    pub async fn ensure_general_channel(&self) -> ServiceResult<Channel> {
        let seed = Channel::new_general(self.ctx.generate_id());
        let channel = self.ctx.channel_repo().upsert_by_name(&seed).await?;

        if channel.id == seed.id {
            info!(channel_id = %channel.id, "General channel created");
        } else {
            info!(channel_id = %channel.id, "General channel already present");
        }
        Ok(channel)
    }

    /// Post a system message to the General channel
    #[instrument(skip(self, content))]
    pub async fn announce(&self, content: &str) -> ServiceResult<MessageResponse> {
        let content = normalize_message_content(content).map_err(ServiceError::validation)?;
        let channel_id = self.general_channel_id().await?;
        MessageService::new(self.ctx)
            .append_and_publish(channel_id, |id| Message::new_system(id, channel_id, content))
            .await
    }

    /// Greet a newcomer in the General channel
    pub async fn welcome(&self, username: Option<&str>) -> ServiceResult<MessageResponse> {
        self.announce(&welcome_text(username)).await
    }

    async fn general_channel_id(&self) -> ServiceResult<Snowflake> {
        match self
            .ctx
            .channel_repo()
            .find_by_name(GENERAL_CHANNEL_NAME)
            .await?
        {
            Some(channel) => Ok(channel.id),
            None => Ok(self.ensure_general_channel().await?.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_uses_username() {
        assert_eq!(
            welcome_text(Some("Johnny")),
            "A new signal detected. The Architect acknowledges you, Johnny. Your story begins now."
        );
    }

    #[test]
    fn test_welcome_falls_back_to_traveler() {
        assert!(welcome_text(None).contains("acknowledges you, traveler."));
        assert!(welcome_text(Some("  ")).contains("acknowledges you, traveler."));
    }
}
