//! Artist reads and admin writes

use serde::Serialize;

use super::keys::{ARTISTS, FOLLOWS, INTERVIEWS};
use super::{artwork_service, follow_service};
use crate::domain::{Artist, ArtistInput, Artwork, ArtworkFilter, DomainError};
use crate::infrastructure::AppState;
use crate::infrastructure::cache::QueryKey;
use crate::utils::text::{optional, optional_url, required};

/// Artist page payload
#[derive(Debug, Clone, Serialize)]
pub struct ArtistProfile {
    #[serde(flatten)]
    pub artist: Artist,
    pub artworks: Vec<Artwork>,
    pub follower_count: u64,
}

pub async fn list_artists(state: &AppState) -> Result<Vec<Artist>, DomainError> {
    let repo = state.artist_repo.clone();
    state
        .cache
        .fetch(QueryKey::new(ARTISTS), move || async move { repo.find_all().await })
        .await
}

pub async fn get_artist(state: &AppState, id: i32) -> Result<Artist, DomainError> {
    let repo = state.artist_repo.clone();
    state
        .cache
        .fetch(QueryKey::new(ARTISTS).param(id), move || async move {
            repo.find_by_id(id).await?.ok_or(DomainError::NotFound)
        })
        .await
}

pub async fn get_artist_profile(state: &AppState, id: i32) -> Result<ArtistProfile, DomainError> {
    let artist = get_artist(state, id).await?;
    let artworks = artwork_service::list_artworks(
        state,
        ArtworkFilter {
            artist_id: Some(id),
            ..Default::default()
        },
    )
    .await?;
    let follower_count = follow_service::follower_count(state, id).await?;

    Ok(ArtistProfile {
        artist,
        artworks,
        follower_count,
    })
}

fn validate(input: ArtistInput) -> Result<ArtistInput, DomainError> {
    Ok(ArtistInput {
        name: required("name", &input.name)?,
        bio: optional(input.bio),
        statement: optional(input.statement),
        nationality: optional(input.nationality),
        image_url: optional_url("image_url", input.image_url)?,
        audio_url: optional_url("audio_url", input.audio_url)?,
        website_url: optional_url("website_url", input.website_url)?,
        instagram_url: optional_url("instagram_url", input.instagram_url)?,
        twitter_url: optional_url("twitter_url", input.twitter_url)?,
    })
}

pub async fn create_artist(state: &AppState, input: ArtistInput) -> Result<Artist, DomainError> {
    let artist = state.artist_repo.create(validate(input)?).await?;
    tracing::info!("Created artist {} ({})", artist.id, artist.name);
    state.cache.invalidate(&QueryKey::new(ARTISTS));
    Ok(artist)
}

pub async fn update_artist(
    state: &AppState,
    id: i32,
    input: ArtistInput,
) -> Result<Artist, DomainError> {
    let artist = state.artist_repo.update(id, validate(input)?).await?;
    tracing::info!("Updated artist {}", id);
    // every view carrying an artwork embeds its artist name
    artwork_service::invalidate_artwork_views(state);
    state.cache.invalidate_entity(INTERVIEWS);
    state.cache.invalidate_entity(FOLLOWS);
    Ok(artist)
}

pub async fn delete_artist(state: &AppState, id: i32) -> Result<(), DomainError> {
    state.artist_repo.delete(id).await?;
    tracing::info!("Deleted artist {}", id);
    state.cache.invalidate(&QueryKey::new(ARTISTS));
    state.cache.invalidate_entity(INTERVIEWS);
    state.cache.invalidate_entity(FOLLOWS);
    Ok(())
}
