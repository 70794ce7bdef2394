//! Profile entity <-> model mapper

use realm_core::entities::Profile;
use realm_core::value_objects::Snowflake;

use crate::models::ProfileModel;

impl From<ProfileModel> for Profile {
    fn from(model: ProfileModel) -> Self {
        Profile {
            id: Snowflake::new(model.id),
            username: model.username,
            avatar_url: model.avatar_url,
            character_class: model.character_class,
            bio: model.bio,
            subscription_tier: model.subscription_tier,
        }
    }
}
