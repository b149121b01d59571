//! Site Service - pages composed from several entities

use sea_orm::{EntityTrait, PaginatorTrait};
use serde::Serialize;

use super::collection_service::{self, CollectionDto};
use super::exhibition_service;
use super::follow_service;
use super::journal_service::{self, JournalFilter};
use super::user_collection_service::{self, UserCollectionDto};
use super::{artwork_service, favorite_service, recommendation_service};
use crate::domain::{Artist, Artwork, ArtworkFilter, DomainError};
use crate::infrastructure::AppState;
use crate::models::{ExhibitionStatus, artist, artwork, collector, exhibition, journal_entry};

const HOME_ARTWORKS: u64 = 6;
const HOME_COLLECTIONS: usize = 3;
const HOME_JOURNAL: u64 = 3;

#[derive(Debug, Clone, Serialize)]
pub struct HomeFeed {
    pub featured_artworks: Vec<Artwork>,
    pub collections: Vec<CollectionDto>,
    pub journal: Vec<journal_entry::Model>,
    pub exhibitions: Vec<exhibition::Model>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AboutInfo {
    pub name: String,
    pub contact_email: Option<String>,
    pub artist_count: u64,
    pub artwork_count: u64,
    pub collector_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub favorites: Vec<Artwork>,
    pub followed_artists: Vec<Artist>,
    pub collections: Vec<UserCollectionDto>,
    pub recommendations: Vec<Artwork>,
}

pub async fn home_feed(state: &AppState) -> Result<HomeFeed, DomainError> {
    let featured_artworks = artwork_service::list_artworks(
        state,
        ArtworkFilter {
            featured: Some(true),
            limit: Some(HOME_ARTWORKS),
            ..Default::default()
        },
    )
    .await?;

    let mut collections = collection_service::list_collections(state).await?;
    collections.truncate(HOME_COLLECTIONS);

    let journal = journal_service::list_published(
        state,
        JournalFilter {
            featured: Some(true),
            limit: Some(HOME_JOURNAL),
            ..Default::default()
        },
    )
    .await?;

    let exhibitions =
        exhibition_service::list_exhibitions(state, Some(ExhibitionStatus::Current)).await?;

    Ok(HomeFeed {
        featured_artworks,
        collections,
        journal,
        exhibitions,
    })
}

pub async fn about(state: &AppState) -> Result<AboutInfo, DomainError> {
    let db = state.db();
    Ok(AboutInfo {
        name: state.config.gallery_name.clone(),
        contact_email: state.config.contact_email.clone(),
        artist_count: artist::Entity::find().count(db).await?,
        artwork_count: artwork::Entity::find().count(db).await?,
        collector_count: collector::Entity::find().count(db).await?,
    })
}

pub async fn dashboard(state: &AppState, user_id: i32) -> Result<Dashboard, DomainError> {
    Ok(Dashboard {
        favorites: favorite_service::list_favorites(state, user_id).await?,
        followed_artists: follow_service::list_followed_artists(state, user_id).await?,
        collections: user_collection_service::list_user_collections(state, user_id).await?,
        recommendations: recommendation_service::get_recommendations(state, user_id).await?,
    })
}
