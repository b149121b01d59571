//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::DomainError;

/// Artist data for API responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artist {
    pub id: i32,
    pub name: String,
    pub bio: Option<String>,
    pub statement: Option<String>,
    pub nationality: Option<String>,
    pub image_url: Option<String>,
    pub audio_url: Option<String>,
    pub website_url: Option<String>,
    pub instagram_url: Option<String>,
    pub twitter_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Editable artist fields, used for both create and update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtistInput {
    pub name: String,
    pub bio: Option<String>,
    pub statement: Option<String>,
    pub nationality: Option<String>,
    pub image_url: Option<String>,
    pub audio_url: Option<String>,
    pub website_url: Option<String>,
    pub instagram_url: Option<String>,
    pub twitter_url: Option<String>,
}

/// Repository trait for Artist entity
#[async_trait]
pub trait ArtistRepository: Send + Sync {
    /// Find all artists, ordered by name
    async fn find_all(&self) -> Result<Vec<Artist>, DomainError>;

    /// Find an artist by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<Artist>, DomainError>;

    async fn create(&self, input: ArtistInput) -> Result<Artist, DomainError>;

    async fn update(&self, id: i32, input: ArtistInput) -> Result<Artist, DomainError>;

    /// Delete an artist. Fails with `Conflict` while artworks still reference it.
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

/// Artwork with the owning artist's name joined in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artwork {
    pub id: i32,
    pub title: String,
    pub artist_id: i32,
    pub artist_name: Option<String>,
    pub collection_id: Option<i32>,
    pub description: Option<String>,
    pub story: Option<String>,
    pub medium: Option<String>,
    pub year: Option<i32>,
    pub edition: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub featured: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Editable artwork fields, used for both create and update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtworkInput {
    pub title: String,
    pub artist_id: i32,
    pub collection_id: Option<i32>,
    pub description: Option<String>,
    pub story: Option<String>,
    pub medium: Option<String>,
    pub year: Option<i32>,
    pub edition: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

/// Filter criteria for artwork queries
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ArtworkFilter {
    pub artist_id: Option<i32>,
    pub collection_id: Option<i32>,
    pub featured: Option<bool>,
    pub medium: Option<String>,
    pub limit: Option<u64>,
}

/// The attributes recommendations are derived from
#[derive(Debug, Clone, PartialEq)]
pub struct ArtworkTraits {
    pub id: i32,
    pub artist_id: i32,
    pub medium: Option<String>,
}

/// Repository trait for Artwork entity
#[async_trait]
pub trait ArtworkRepository: Send + Sync {
    /// Find artworks matching the filter, newest first
    async fn find_all(&self, filter: ArtworkFilter) -> Result<Vec<Artwork>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Artwork>, DomainError>;

    /// Find artworks by ID; missing IDs are skipped, order is not guaranteed
    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Artwork>, DomainError>;

    /// Newest featured artworks, skipping `exclude`
    async fn find_featured(&self, exclude: &[i32], limit: u64)
    -> Result<Vec<Artwork>, DomainError>;

    /// Artworks by any of `artist_ids` OR in any of `mediums`, skipping `exclude`.
    /// Empty slices contribute no clause; both empty yields no rows.
    async fn find_similar(
        &self,
        artist_ids: &[i32],
        mediums: &[String],
        exclude: &[i32],
        limit: u64,
    ) -> Result<Vec<Artwork>, DomainError>;

    async fn find_traits(&self, ids: &[i32]) -> Result<Vec<ArtworkTraits>, DomainError>;

    async fn create(&self, input: ArtworkInput) -> Result<Artwork, DomainError>;

    async fn update(&self, id: i32, input: ArtworkInput) -> Result<Artwork, DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

/// Repository trait for a user's interactions with artworks (favorites and views)
#[async_trait]
pub trait InteractionRepository: Send + Sync {
    async fn favorite_artwork_ids(&self, user_id: i32) -> Result<Vec<i32>, DomainError>;

    async fn viewed_artwork_ids(&self, user_id: i32) -> Result<Vec<i32>, DomainError>;

    async fn is_favorite(&self, user_id: i32, artwork_id: i32) -> Result<bool, DomainError>;

    /// Idempotently put the favorite in the requested state
    async fn set_favorite(
        &self,
        user_id: i32,
        artwork_id: i32,
        on: bool,
    ) -> Result<(), DomainError>;

    /// Insert or refresh the view timestamp
    async fn record_view(&self, user_id: i32, artwork_id: i32) -> Result<(), DomainError>;
}
