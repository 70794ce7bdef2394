//! Message entity <-> model mapper

use realm_core::entities::{Message, MessageType};
use realm_core::error::DomainError;
use realm_core::value_objects::Snowflake;

use crate::models::MessageModel;

use super::corrupt_row;

/// Convert MessageModel to Message entity
impl TryFrom<MessageModel> for Message {
    type Error = DomainError;

    fn try_from(model: MessageModel) -> Result<Self, Self::Error> {
        let message_type = MessageType::parse(&model.message_type)
            .ok_or_else(|| corrupt_row("messages", "message_type", &model.message_type))?;

        Ok(Message {
            id: Snowflake::new(model.id),
            channel_id: Snowflake::new(model.channel_id),
            user_id: model.user_id.map(Snowflake::new),
            content: model.content,
            message_type,
            parent_id: model.parent_id.map(Snowflake::new),
            created_at: model.created_at,
        })
    }
}

/// Message entity flattened into bind values for insertion
pub struct MessageInsert<'a> {
    pub id: i64,
    pub channel_id: i64,
    pub user_id: Option<i64>,
    pub content: &'a str,
    pub message_type: &'static str,
    pub parent_id: Option<i64>,
}

impl<'a> MessageInsert<'a> {
    pub fn new(message: &'a Message) -> Self {
        Self {
            id: message.id.into_inner(),
            channel_id: message.channel_id.into_inner(),
            user_id: message.user_id.map(Snowflake::into_inner),
            content: &message.content,
            message_type: message.message_type.as_str(),
            parent_id: message.parent_id.map(Snowflake::into_inner),
        }
    }
}
