//! Message service
//!
//! Handles message windows, thread assembly, and message creation.
//!
//! Creation runs: interpret slash commands on the raw input → validate →
//! authorize → mint the id, append and publish under the channel's sequencer
//! lock, so subscribers see messages in the same order the store returns them.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use realm_core::entities::{normalize_message_content, Message, MessageType, Profile, Reaction};
use realm_core::events::MessageCreatedEvent;
use realm_core::traits::MessageQuery;
use realm_core::{assemble, interpret, DomainError, DomainEvent, MessageNode, Snowflake};
use tracing::{debug, info, instrument};
use validator::Validate;

use crate::dto::{CreateMessageRequest, MessageListQuery, MessageResponse};

use super::access::{parse_id, require_id, AccessService};
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

const CHANNEL_ID_REQUIRED: &str = "Channel ID is required";

/// Classify the raw input, then validate what will actually be stored.
///
/// Slash commands are recognised only at the very start of the input; leading
/// whitespace makes it plain chat.
fn prepare_content(request: &CreateMessageRequest) -> ServiceResult<(MessageType, String)> {
    normalize_message_content(&request.content).map_err(ServiceError::validation)?;
    request.validate()?;

    let prepared = interpret(&request.content);
    let message_type = if prepared.is_command_output() {
        prepared.message_type
    } else {
        MessageType::from_client(request.message_type.as_deref())
    };
    let content = normalize_message_content(&prepared.content).map_err(ServiceError::validation)?;
    Ok((message_type, content))
}

/// Message service
pub struct MessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageService<'a> {
    /// Create a new MessageService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Up to 50 messages in ascending `(created_at, id)` order, enriched.
    ///
    /// Without `sinceId` this is the latest window; with it, the messages that
    /// follow the anchor.
    #[instrument(skip(self, query))]
    pub async fn list_messages(
        &self,
        user_id: Snowflake,
        query: MessageListQuery,
    ) -> ServiceResult<Vec<MessageResponse>> {
        let channel_id = require_id(query.channel_id.as_deref(), "channel ID", CHANNEL_ID_REQUIRED)?;
        let since = query
            .since_id
            .as_deref()
            .map(|raw| parse_id(raw, "sinceId"))
            .transpose()?;

        AccessService::new(self.ctx)
            .require_read(channel_id, user_id)
            .await?;

        let messages = self
            .ctx
            .message_repo()
            .query(channel_id, MessageQuery::new(since, query.limit))
            .await?;

        debug!(channel_id = %channel_id, count = messages.len(), "Fetched message window");

        self.enrich(messages).await
    }

    /// The same window as [`Self::list_messages`], assembled into reply trees
    #[instrument(skip(self, query))]
    pub async fn get_thread(
        &self,
        user_id: Snowflake,
        query: MessageListQuery,
    ) -> ServiceResult<Vec<MessageNode<MessageResponse>>> {
        let window = self.list_messages(user_id, query).await?;
        Ok(assemble(window))
    }

    /// Interpret, authorize, append and publish a message
    #[instrument(skip(self, request))]
    pub async fn create_message(
        &self,
        user_id: Snowflake,
        request: CreateMessageRequest,
    ) -> ServiceResult<MessageResponse> {
        let channel_id = require_id(request.channel_id.as_deref(), "channel ID", CHANNEL_ID_REQUIRED)?;
        let (message_type, content) = prepare_content(&request)?;
        let parent_id = request
            .parent_id
            .as_deref()
            .map(|raw| parse_id(raw, "parent ID"))
            .transpose()?;

        AccessService::new(self.ctx)
            .require_write(channel_id, user_id)
            .await?;

        if let Some(parent_id) = parent_id {
            self.check_parent(channel_id, parent_id).await?;
        }

        self.append_and_publish(channel_id, |id| {
            Message::new(id, channel_id, user_id, content, message_type).with_parent(parent_id)
        })
        .await
    }

    /// Append a message and publish it while holding the channel's sequencer lock.
    ///
    /// `build` receives the id minted under the lock and stamps `created_at`
    /// there too, so a write that waited longer never sorts ahead of one that
    /// was already published.
    pub(crate) async fn append_and_publish(
        &self,
        channel_id: Snowflake,
        build: impl FnOnce(Snowflake) -> Message,
    ) -> ServiceResult<MessageResponse> {
        let turn = self
            .ctx
            .sequencer()
            .next_turn(channel_id, || self.ctx.generate_id())
            .await;
        let message = build(turn.id());

        let stored = self.ctx.message_repo().append(&message).await?;
        let response = self.enrich_one(stored).await?;

        info!(
            message_id = %response.id,
            channel_id = %channel_id,
            message_type = response.message_type.as_str(),
            "Message created"
        );

        let event = DomainEvent::MessageCreated(MessageCreatedEvent {
            message_id: response.id,
            channel_id,
            author_id: response.user_id,
            parent_id: response.parent_id,
            timestamp: Utc::now(),
        });
        self.ctx.publish_event(&event, &response).await;

        Ok(response)
    }

    async fn check_parent(&self, channel_id: Snowflake, parent_id: Snowflake) -> ServiceResult<()> {
        let parent = self
            .ctx
            .message_repo()
            .find_by_id(parent_id)
            .await?
            .ok_or(DomainError::MessageNotFound(parent_id))?;
        if parent.channel_id != channel_id {
            return Err(DomainError::ParentNotInChannel.into());
        }
        Ok(())
    }

    async fn enrich_one(&self, message: Message) -> ServiceResult<MessageResponse> {
        let mut enriched = self.enrich(vec![message]).await?;
        enriched
            .pop()
            .ok_or_else(|| ServiceError::internal("enrichment dropped a message"))
    }

    /// Attach profiles and reactions with one batch lookup each
    async fn enrich(&self, messages: Vec<Message>) -> ServiceResult<Vec<MessageResponse>> {
        if messages.is_empty() {
            return Ok(Vec::new());
        }

        let author_ids: Vec<Snowflake> = messages
            .iter()
            .filter_map(|m| m.user_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let message_ids: Vec<Snowflake> = messages.iter().map(|m| m.id).collect();

        let profiles: HashMap<Snowflake, Profile> = if author_ids.is_empty() {
            HashMap::new()
        } else {
            self.ctx
                .profile_repo()
                .find_by_ids(&author_ids)
                .await?
                .into_iter()
                .map(|p| (p.id, p))
                .collect()
        };

        let mut reactions: HashMap<Snowflake, Vec<Reaction>> = HashMap::new();
        for reaction in self
            .ctx
            .reaction_repo()
            .find_by_messages(&message_ids)
            .await?
        {
            reactions.entry(reaction.message_id).or_default().push(reaction);
        }

        Ok(messages
            .into_iter()
            .map(|message| {
                let author = message.user_id.and_then(|id| profiles.get(&id));
                let attached = reactions.get(&message.id).map_or(&[][..], Vec::as_slice);
                MessageResponse::enrich(message, author, attached)
            })
            .collect())
    }
}
