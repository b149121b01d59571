//! User Collection Service - personal artwork lists
//!
//! Every query is scoped by the owner; another user's collection is
//! reported as missing.

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};

use super::artwork_service;
use super::keys::USER_COLLECTIONS;
use crate::domain::{Artwork, DomainError};
use crate::infrastructure::AppState;
use crate::infrastructure::cache::QueryKey;
use crate::models::user_collection::{self as user_collection_model, Entity as UserCollection};
use crate::models::user_collection_artwork::{self, Entity as UserCollectionArtwork};
use crate::utils::text::{optional, required};

#[derive(Debug, Clone, Serialize)]
pub struct UserCollectionDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub artwork_count: u64,
    pub created_at: String,
    pub updated_at: String,
}

impl UserCollectionDto {
    fn from_model(model: user_collection_model::Model, artwork_count: u64) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            is_public: model.is_public,
            artwork_count,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserCollectionDetail {
    #[serde(flatten)]
    pub collection: UserCollectionDto,
    pub artworks: Vec<Artwork>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserCollectionInput {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

async fn find_owned(
    db: &DatabaseConnection,
    user_id: i32,
    id: i32,
) -> Result<user_collection_model::Model, DomainError> {
    UserCollection::find_by_id(id)
        .filter(user_collection_model::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or(DomainError::NotFound)
}

async fn artwork_ids(db: &DatabaseConnection, id: i32) -> Result<Vec<i32>, DomainError> {
    Ok(UserCollectionArtwork::find()
        .filter(user_collection_artwork::Column::UserCollectionId.eq(id))
        .order_by_desc(user_collection_artwork::Column::AddedAt)
        .all(db)
        .await?
        .into_iter()
        .map(|row| row.artwork_id)
        .collect())
}

async fn count_artworks(db: &DatabaseConnection, id: i32) -> Result<u64, DomainError> {
    Ok(UserCollectionArtwork::find()
        .filter(user_collection_artwork::Column::UserCollectionId.eq(id))
        .count(db)
        .await?)
}

pub async fn list_user_collections(
    state: &AppState,
    user_id: i32,
) -> Result<Vec<UserCollectionDto>, DomainError> {
    let db = state.db().clone();
    state
        .cache
        .fetch(
            QueryKey::new(USER_COLLECTIONS).param("list").for_user(user_id),
            move || async move {
                let rows = UserCollection::find()
                    .filter(user_collection_model::Column::UserId.eq(user_id))
                    .order_by_desc(user_collection_model::Column::UpdatedAt)
                    .all(&db)
                    .await?;
                let mut collections = Vec::with_capacity(rows.len());
                for row in rows {
                    let count = count_artworks(&db, row.id).await?;
                    collections.push(UserCollectionDto::from_model(row, count));
                }
                Ok(collections)
            },
        )
        .await
}

pub async fn get_user_collection(
    state: &AppState,
    user_id: i32,
    id: i32,
) -> Result<UserCollectionDetail, DomainError> {
    let state_for_load = state.clone();
    state
        .cache
        .fetch(
            QueryKey::new(USER_COLLECTIONS).param("id").param(id).for_user(user_id),
            move || async move {
                let db = state_for_load.db();
                let model = find_owned(db, user_id, id).await?;
                let ids = artwork_ids(db, id).await?;
                let artworks = artwork_service::find_in_order(&state_for_load, &ids).await?;
                Ok(UserCollectionDetail {
                    collection: UserCollectionDto::from_model(model, ids.len() as u64),
                    artworks,
                })
            },
        )
        .await
}

fn invalidate(state: &AppState, user_id: i32) {
    state
        .cache
        .invalidate(&QueryKey::new(USER_COLLECTIONS).for_user(user_id));
}

pub async fn create_user_collection(
    state: &AppState,
    user_id: i32,
    input: UserCollectionInput,
) -> Result<UserCollectionDto, DomainError> {
    let name = required("name", &input.name)?;
    let now = chrono::Utc::now().to_rfc3339();

    let model = user_collection_model::ActiveModel {
        user_id: Set(user_id),
        name: Set(name),
        description: Set(optional(input.description)),
        is_public: Set(input.is_public),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(state.db())
    .await?;

    tracing::info!("User {} created collection {}", user_id, model.id);
    invalidate(state, user_id);
    Ok(UserCollectionDto::from_model(model, 0))
}

pub async fn update_user_collection(
    state: &AppState,
    user_id: i32,
    id: i32,
    input: UserCollectionInput,
) -> Result<UserCollectionDto, DomainError> {
    let name = required("name", &input.name)?;
    let existing = find_owned(state.db(), user_id, id).await?;

    let mut active: user_collection_model::ActiveModel = existing.into();
    active.name = Set(name);
    active.description = Set(optional(input.description));
    active.is_public = Set(input.is_public);
    active.updated_at = Set(chrono::Utc::now().to_rfc3339());
    let model = active.update(state.db()).await?;

    invalidate(state, user_id);
    let count = count_artworks(state.db(), id).await?;
    Ok(UserCollectionDto::from_model(model, count))
}

pub async fn delete_user_collection(
    state: &AppState,
    user_id: i32,
    id: i32,
) -> Result<(), DomainError> {
    let result = UserCollection::delete_many()
        .filter(user_collection_model::Column::Id.eq(id))
        .filter(user_collection_model::Column::UserId.eq(user_id))
        .exec(state.db())
        .await?;
    if result.rows_affected == 0 {
        return Err(DomainError::NotFound);
    }
    tracing::info!("User {} deleted collection {}", user_id, id);
    invalidate(state, user_id);
    Ok(())
}

/// Add an artwork to the collection. Adding it twice keeps one row.
pub async fn add_artwork(
    state: &AppState,
    user_id: i32,
    id: i32,
    artwork_id: i32,
) -> Result<(), DomainError> {
    find_owned(state.db(), user_id, id).await?;
    artwork_service::get_artwork(state, artwork_id).await?;

    UserCollectionArtwork::insert(user_collection_artwork::ActiveModel {
        user_collection_id: Set(id),
        artwork_id: Set(artwork_id),
        added_at: Set(chrono::Utc::now().to_rfc3339()),
    })
    .on_conflict(
        OnConflict::columns([
            user_collection_artwork::Column::UserCollectionId,
            user_collection_artwork::Column::ArtworkId,
        ])
        .do_nothing()
        .to_owned(),
    )
    .exec_without_returning(state.db())
    .await?;

    invalidate(state, user_id);
    Ok(())
}

pub async fn remove_artwork(
    state: &AppState,
    user_id: i32,
    id: i32,
    artwork_id: i32,
) -> Result<(), DomainError> {
    find_owned(state.db(), user_id, id).await?;
    UserCollectionArtwork::delete_many()
        .filter(user_collection_artwork::Column::UserCollectionId.eq(id))
        .filter(user_collection_artwork::Column::ArtworkId.eq(artwork_id))
        .exec(state.db())
        .await?;

    invalidate(state, user_id);
    Ok(())
}
