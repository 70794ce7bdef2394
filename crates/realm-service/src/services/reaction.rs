//! Reaction service
//!
//! Toggles energy reactions on messages and notifies channel subscribers.

use chrono::Utc;
use realm_core::entities::{Reaction, ReactionType};
use realm_core::events::ReactionToggledEvent;
use realm_core::{DomainError, DomainEvent, Snowflake};
use tracing::{info, instrument};

use crate::dto::{ReactionToggleResponse, ToggleReactionRequest};

use super::access::AccessService;
use super::context::ServiceContext;
use super::error::ServiceResult;

/// Reaction service
pub struct ReactionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionService<'a> {
    /// Create a new ReactionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Add the reaction, or remove it if the user already left the same one
    #[instrument(skip(self, request))]
    pub async fn toggle_reaction(
        &self,
        message_id: Snowflake,
        user_id: Snowflake,
        request: ToggleReactionRequest,
    ) -> ServiceResult<ReactionToggleResponse> {
        let reaction_type = ReactionType::parse(request.reaction_type.trim())
            .ok_or_else(|| DomainError::InvalidReactionType(request.reaction_type.clone()))?;

        let message = self
            .ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .ok_or(DomainError::MessageNotFound(message_id))?;

        AccessService::new(self.ctx)
            .require_write(message.channel_id, user_id)
            .await?;

        let reaction = Reaction::new(self.ctx.generate_id(), user_id, message_id, reaction_type);
        let outcome = self.ctx.reaction_repo().toggle(&reaction).await?;
        let count = self
            .ctx
            .reaction_repo()
            .count(message_id, reaction_type)
            .await?;

        info!(
            message_id = %message_id,
            user_id = %user_id,
            reaction = reaction_type.token(),
            added = outcome.is_added(),
            "Reaction toggled"
        );

        let response = ReactionToggleResponse {
            message_id,
            reaction_type,
            added: outcome.is_added(),
            count,
        };

        let event = DomainEvent::ReactionToggled(ReactionToggledEvent {
            message_id,
            channel_id: message.channel_id,
            user_id,
            reaction_type,
            added: outcome.is_added(),
            timestamp: Utc::now(),
        });
        self.ctx
            .publish_event(
                &event,
                &serde_json::json!({
                    "message_id": message_id,
                    "channel_id": message.channel_id,
                    "user_id": user_id,
                    "reaction_type": reaction_type,
                    "added": response.added,
                    "count": count,
                }),
            )
            .await;

        Ok(response)
    }
}
