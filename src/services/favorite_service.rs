//! Favorite Service - a user's saved artworks
//!
//! Favorites are a two-state relation: [`set_favorite`] puts the pair in the
//! requested state and is safe to repeat; [`toggle_favorite`] is built on it.

use super::artwork_service;
use super::keys::{FAVORITES, RECOMMENDATIONS};
use crate::domain::{Artwork, DomainError};
use crate::infrastructure::AppState;
use crate::infrastructure::cache::QueryKey;

pub async fn is_favorite(state: &AppState, user_id: i32, artwork_id: i32) -> Result<bool, DomainError> {
    let repo = state.interaction_repo.clone();
    state
        .cache
        .fetch(
            QueryKey::new(FAVORITES).param("is").param(artwork_id).for_user(user_id),
            move || async move { repo.is_favorite(user_id, artwork_id).await },
        )
        .await
}

pub async fn set_favorite(
    state: &AppState,
    user_id: i32,
    artwork_id: i32,
    on: bool,
) -> Result<bool, DomainError> {
    if on {
        // unknown artworks are a 404, not a foreign-key conflict
        artwork_service::get_artwork(state, artwork_id).await?;
    }
    state.interaction_repo.set_favorite(user_id, artwork_id, on).await?;
    tracing::debug!(user_id, artwork_id, on, "favorite set");

    state.cache.invalidate(&QueryKey::new(FAVORITES).for_user(user_id));
    state.cache.invalidate(&QueryKey::new(RECOMMENDATIONS).for_user(user_id));
    Ok(on)
}

/// Flip the favorite and return the new state.
pub async fn toggle_favorite(state: &AppState, user_id: i32, artwork_id: i32) -> Result<bool, DomainError> {
    let current = state.interaction_repo.is_favorite(user_id, artwork_id).await?;
    set_favorite(state, user_id, artwork_id, !current).await
}

/// Favorited artworks, most recently saved first
pub async fn list_favorites(state: &AppState, user_id: i32) -> Result<Vec<Artwork>, DomainError> {
    let state_for_load = state.clone();
    state
        .cache
        .fetch(
            QueryKey::new(FAVORITES).param("list").for_user(user_id),
            move || async move {
                let ids = state_for_load
                    .interaction_repo
                    .favorite_artwork_ids(user_id)
                    .await?;
                artwork_service::find_in_order(&state_for_load, &ids).await
            },
        )
        .await
}
