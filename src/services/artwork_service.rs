//! Artwork reads, comparison, view tracking and admin writes

use std::collections::HashMap;

use super::keys::{
    ARTISTS, ARTWORKS, COLLECTIONS, EXHIBITIONS, FAVORITES, RECOMMENDATIONS, USER_COLLECTIONS,
};
use crate::domain::{Artwork, ArtworkFilter, ArtworkInput, DomainError};
use crate::infrastructure::AppState;
use crate::infrastructure::cache::QueryKey;
use crate::utils::text::{optional, optional_url, required};

/// Most artworks shown side by side on the compare page
pub const MAX_COMPARE: usize = 4;

fn filter_params(filter: &ArtworkFilter) -> [String; 5] {
    fn opt<T: ToString>(v: &Option<T>) -> String {
        v.as_ref().map(ToString::to_string).unwrap_or_default()
    }
    [
        opt(&filter.artist_id),
        opt(&filter.collection_id),
        opt(&filter.featured),
        opt(&filter.medium),
        opt(&filter.limit),
    ]
}

pub async fn list_artworks(
    state: &AppState,
    filter: ArtworkFilter,
) -> Result<Vec<Artwork>, DomainError> {
    let mut key = QueryKey::new(ARTWORKS).param("list");
    for p in filter_params(&filter) {
        key = key.param(p);
    }

    let repo = state.artwork_repo.clone();
    state
        .cache
        .fetch(key, move || async move { repo.find_all(filter).await })
        .await
}

pub async fn get_artwork(state: &AppState, id: i32) -> Result<Artwork, DomainError> {
    let repo = state.artwork_repo.clone();
    state
        .cache
        .fetch(QueryKey::new(ARTWORKS).param(id), move || async move {
            repo.find_by_id(id).await?.ok_or(DomainError::NotFound)
        })
        .await
}

/// Artworks in the order the IDs were given. Unknown IDs are skipped.
pub async fn find_in_order(state: &AppState, ids: &[i32]) -> Result<Vec<Artwork>, DomainError> {
    let found = state.artwork_repo.find_by_ids(ids).await?;
    let mut by_id: HashMap<i32, Artwork> = found.into_iter().map(|a| (a.id, a)).collect();
    Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
}

/// Side-by-side comparison of up to [`MAX_COMPARE`] artworks.
pub async fn compare_artworks(state: &AppState, ids: &[i32]) -> Result<Vec<Artwork>, DomainError> {
    let mut unique = Vec::with_capacity(MAX_COMPARE);
    for id in ids {
        if !unique.contains(id) {
            unique.push(*id);
        }
    }
    if unique.is_empty() {
        return Err(DomainError::validation("at least one artwork id is required"));
    }
    unique.truncate(MAX_COMPARE);

    let key = unique
        .iter()
        .fold(QueryKey::new(ARTWORKS).param("compare"), |key, id| key.param(id));
    let state_for_load = state.clone();
    state
        .cache
        .fetch(key, move || async move { find_in_order(&state_for_load, &unique).await })
        .await
}

/// Remember that a signed-in user opened an artwork.
pub async fn record_view(state: &AppState, user_id: i32, artwork_id: i32) -> Result<(), DomainError> {
    get_artwork(state, artwork_id).await?;
    state.interaction_repo.record_view(user_id, artwork_id).await?;
    state
        .cache
        .invalidate(&QueryKey::new(RECOMMENDATIONS).for_user(user_id));
    Ok(())
}

fn validate(input: ArtworkInput) -> Result<ArtworkInput, DomainError> {
    if let Some(price) = input.price
        && (price.is_nan() || price < 0.0)
    {
        return Err(DomainError::validation("price must be a non-negative number"));
    }
    Ok(ArtworkInput {
        title: required("title", &input.title)?,
        description: optional(input.description),
        story: optional(input.story),
        medium: optional(input.medium),
        edition: optional(input.edition),
        image_url: optional_url("image_url", input.image_url)?,
        ..input
    })
}

/// Everything that embeds artwork rows goes stale together.
pub(crate) fn invalidate_artwork_views(state: &AppState) {
    for entity in [
        ARTWORKS,
        ARTISTS,
        COLLECTIONS,
        EXHIBITIONS,
        FAVORITES,
        USER_COLLECTIONS,
        RECOMMENDATIONS,
    ] {
        state.cache.invalidate_entity(entity);
    }
}

pub async fn create_artwork(state: &AppState, input: ArtworkInput) -> Result<Artwork, DomainError> {
    let artwork = state.artwork_repo.create(validate(input)?).await?;
    tracing::info!(
        "Created artwork {} ({}) for artist {}",
        artwork.id,
        artwork.title,
        artwork.artist_id
    );
    invalidate_artwork_views(state);
    Ok(artwork)
}

pub async fn update_artwork(
    state: &AppState,
    id: i32,
    input: ArtworkInput,
) -> Result<Artwork, DomainError> {
    let artwork = state.artwork_repo.update(id, validate(input)?).await?;
    tracing::info!("Updated artwork {}", id);
    invalidate_artwork_views(state);
    Ok(artwork)
}

pub async fn delete_artwork(state: &AppState, id: i32) -> Result<(), DomainError> {
    state.artwork_repo.delete(id).await?;
    tracing::info!("Deleted artwork {}", id);
    invalidate_artwork_views(state);
    Ok(())
}
