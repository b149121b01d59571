//! Collection Service - curated drops of artworks

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};

use super::artwork_service;
use super::keys::{ARTWORKS, COLLECTIONS};
use crate::domain::{Artwork, ArtworkFilter, DomainError};
use crate::infrastructure::AppState;
use crate::infrastructure::cache::QueryKey;
use crate::models::PublishStatus;
use crate::models::artwork;
use crate::models::collection::{self as collection_model, Entity as Collection};
use crate::utils::text::{optional, optional_url, required};

/// Collection DTO for API responses
#[derive(Debug, Clone, Serialize)]
pub struct CollectionDto {
    pub id: i32,
    pub name: String,
    pub curator_statement: Option<String>,
    pub release_date: Option<String>,
    pub image_url: Option<String>,
    pub status: PublishStatus,
    pub artwork_count: u64,
    pub created_at: String,
    pub updated_at: String,
}

impl CollectionDto {
    fn from_model(model: collection_model::Model, artwork_count: u64) -> Self {
        Self {
            id: model.id,
            name: model.name,
            curator_statement: model.curator_statement,
            release_date: model.release_date,
            image_url: model.image_url,
            status: model.status,
            artwork_count,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Collection page payload
#[derive(Debug, Clone, Serialize)]
pub struct CollectionDetail {
    #[serde(flatten)]
    pub collection: CollectionDto,
    pub artworks: Vec<Artwork>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionInput {
    pub name: String,
    pub curator_statement: Option<String>,
    pub release_date: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub status: PublishStatus,
}

async fn load_collections(
    db: &sea_orm::DatabaseConnection,
    published_only: bool,
) -> Result<Vec<CollectionDto>, DomainError> {
    let mut query = Collection::find();
    if published_only {
        query = query.filter(collection_model::Column::Status.eq(PublishStatus::Published));
    }
    let rows = query
        .order_by_desc(collection_model::Column::ReleaseDate)
        .order_by_asc(collection_model::Column::Name)
        .all(db)
        .await?;

    let mut collections = Vec::with_capacity(rows.len());
    for row in rows {
        let count = count_artworks(db, row.id).await?;
        collections.push(CollectionDto::from_model(row, count));
    }
    Ok(collections)
}

async fn count_artworks(db: &sea_orm::DatabaseConnection, id: i32) -> Result<u64, DomainError> {
    Ok(artwork::Entity::find()
        .filter(artwork::Column::CollectionId.eq(id))
        .count(db)
        .await?)
}

/// Published collections, newest release first
pub async fn list_collections(state: &AppState) -> Result<Vec<CollectionDto>, DomainError> {
    let db = state.db().clone();
    state
        .cache
        .fetch(QueryKey::new(COLLECTIONS).param("published"), move || async move {
            load_collections(&db, true).await
        })
        .await
}

/// Every collection, drafts included
pub async fn list_all_collections(state: &AppState) -> Result<Vec<CollectionDto>, DomainError> {
    let db = state.db().clone();
    state
        .cache
        .fetch(QueryKey::new(COLLECTIONS).param("all"), move || async move {
            load_collections(&db, false).await
        })
        .await
}

/// Any collection by ID, drafts included
pub async fn get_collection(state: &AppState, id: i32) -> Result<CollectionDto, DomainError> {
    let db = state.db().clone();
    state
        .cache
        .fetch(QueryKey::new(COLLECTIONS).param("id").param(id), move || async move {
            let model = Collection::find_by_id(id)
                .one(&db)
                .await?
                .ok_or(DomainError::NotFound)?;
            let count = count_artworks(&db, id).await?;
            Ok(CollectionDto::from_model(model, count))
        })
        .await
}

/// Public collection page. Drafts are reported as missing.
pub async fn get_published_collection(
    state: &AppState,
    id: i32,
) -> Result<CollectionDetail, DomainError> {
    let collection = get_collection(state, id).await?;
    if collection.status != PublishStatus::Published {
        return Err(DomainError::NotFound);
    }
    let artworks = artwork_service::list_artworks(
        state,
        ArtworkFilter {
            collection_id: Some(id),
            ..Default::default()
        },
    )
    .await?;
    Ok(CollectionDetail {
        collection,
        artworks,
    })
}

fn validate(input: CollectionInput) -> Result<CollectionInput, DomainError> {
    Ok(CollectionInput {
        name: required("name", &input.name)?,
        curator_statement: optional(input.curator_statement),
        release_date: optional(input.release_date),
        image_url: optional_url("image_url", input.image_url)?,
        status: input.status,
    })
}

pub async fn create_collection(
    state: &AppState,
    input: CollectionInput,
) -> Result<CollectionDto, DomainError> {
    let input = validate(input)?;
    let now = chrono::Utc::now().to_rfc3339();

    let model = collection_model::ActiveModel {
        name: Set(input.name),
        curator_statement: Set(input.curator_statement),
        release_date: Set(input.release_date),
        image_url: Set(input.image_url),
        status: Set(input.status),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(state.db())
    .await?;

    tracing::info!("Created collection {} ({})", model.id, model.name);
    state.cache.invalidate(&QueryKey::new(COLLECTIONS));
    Ok(CollectionDto::from_model(model, 0))
}

pub async fn update_collection(
    state: &AppState,
    id: i32,
    input: CollectionInput,
) -> Result<CollectionDto, DomainError> {
    let input = validate(input)?;
    let existing = Collection::find_by_id(id)
        .one(state.db())
        .await?
        .ok_or(DomainError::NotFound)?;

    let mut active: collection_model::ActiveModel = existing.into();
    active.name = Set(input.name);
    active.curator_statement = Set(input.curator_statement);
    active.release_date = Set(input.release_date);
    active.image_url = Set(input.image_url);
    active.status = Set(input.status);
    active.updated_at = Set(chrono::Utc::now().to_rfc3339());
    let model = active.update(state.db()).await?;

    tracing::info!("Updated collection {}", id);
    state.cache.invalidate(&QueryKey::new(COLLECTIONS));
    let count = count_artworks(state.db(), id).await?;
    Ok(CollectionDto::from_model(model, count))
}

pub async fn delete_collection(state: &AppState, id: i32) -> Result<(), DomainError> {
    let result = Collection::delete_by_id(id).exec(state.db()).await?;
    if result.rows_affected == 0 {
        return Err(DomainError::NotFound);
    }
    tracing::info!("Deleted collection {}", id);
    state.cache.invalidate(&QueryKey::new(COLLECTIONS));
    // artworks of the collection now have no collection_id
    state.cache.invalidate_entity(ARTWORKS);
    Ok(())
}
