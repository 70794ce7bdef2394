//! Reaction entity <-> model mapper

use realm_core::entities::{Reaction, ReactionType};
use realm_core::error::DomainError;
use realm_core::value_objects::Snowflake;

use crate::models::ReactionModel;

use super::corrupt_row;

impl TryFrom<ReactionModel> for Reaction {
    type Error = DomainError;

    fn try_from(model: ReactionModel) -> Result<Self, Self::Error> {
        let reaction_type = ReactionType::parse(&model.reaction_type)
            .ok_or_else(|| corrupt_row("reactions", "reaction_type", &model.reaction_type))?;

        Ok(Reaction {
            id: Snowflake::new(model.id),
            user_id: Snowflake::new(model.user_id),
            message_id: Snowflake::new(model.message_id),
            reaction_type,
            created_at: model.created_at,
        })
    }
}
