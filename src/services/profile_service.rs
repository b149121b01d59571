//! Profile Service - the signed-in user's public details

use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};

use super::keys::PROFILE;
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::infrastructure::cache::QueryKey;
use crate::models::user::{self as user_model, Entity as User};
use crate::utils::text::{optional, optional_url};

#[derive(Debug, Clone, Serialize)]
pub struct ProfileDto {
    pub id: i32,
    pub email: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<user_model::Model> for ProfileDto {
    fn from(model: user_model::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            display_name: model.display_name,
            bio: model.bio,
            avatar_url: model.avatar_url,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileInput {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

pub async fn get_profile(state: &AppState, user_id: i32) -> Result<ProfileDto, DomainError> {
    let db = state.db().clone();
    state
        .cache
        .fetch(QueryKey::new(PROFILE).for_user(user_id), move || async move {
            User::find_by_id(user_id)
                .one(&db)
                .await?
                .map(ProfileDto::from)
                .ok_or(DomainError::NotFound)
        })
        .await
}

pub async fn update_profile(
    state: &AppState,
    user_id: i32,
    input: ProfileInput,
) -> Result<ProfileDto, DomainError> {
    let avatar_url = optional_url("avatar_url", input.avatar_url)?;
    let existing = User::find_by_id(user_id)
        .one(state.db())
        .await?
        .ok_or(DomainError::NotFound)?;

    let mut active: user_model::ActiveModel = existing.into();
    active.display_name = Set(optional(input.display_name));
    active.bio = Set(optional(input.bio));
    active.avatar_url = Set(avatar_url);
    active.updated_at = Set(chrono::Utc::now().to_rfc3339());
    let model = active.update(state.db()).await?;

    tracing::info!("User {} updated their profile", user_id);
    state.cache.invalidate(&QueryKey::new(PROFILE).for_user(user_id));
    Ok(ProfileDto::from(model))
}
