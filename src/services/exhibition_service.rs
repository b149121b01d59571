//! Exhibition Service - shows and their ordered artwork line-up

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};

use super::artwork_service;
use super::journal_service::{resolve_slug, slug_conflict};
use super::keys::EXHIBITIONS;
use crate::domain::{Artwork, DomainError};
use crate::infrastructure::AppState;
use crate::infrastructure::cache::QueryKey;
use crate::models::ExhibitionStatus;
use crate::models::exhibition::{self as exhibition_model, Entity as Exhibition};
use crate::models::exhibition_artwork::{self, Entity as ExhibitionArtwork};
use crate::utils::text::{optional, optional_url, required};

/// Exhibition page payload, artworks in display order
#[derive(Debug, Clone, Serialize)]
pub struct ExhibitionDetail {
    #[serde(flatten)]
    pub exhibition: exhibition_model::Model,
    pub artworks: Vec<Artwork>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExhibitionInput {
    pub title: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default)]
    pub status: ExhibitionStatus,
}

pub async fn list_exhibitions(
    state: &AppState,
    status: Option<ExhibitionStatus>,
) -> Result<Vec<exhibition_model::Model>, DomainError> {
    let key = QueryKey::new(EXHIBITIONS)
        .param("list")
        .param(status.map(|s| format!("{:?}", s)).unwrap_or_default());
    let db = state.db().clone();
    state
        .cache
        .fetch(key, move || async move {
            let mut query = Exhibition::find();
            if let Some(status) = status {
                query = query.filter(exhibition_model::Column::Status.eq(status));
            }
            Ok(query
                .order_by_desc(exhibition_model::Column::StartDate)
                .order_by_asc(exhibition_model::Column::Title)
                .all(&db)
                .await?)
        })
        .await
}

async fn ordered_artwork_ids(db: &DatabaseConnection, exhibition_id: i32) -> Result<Vec<i32>, DomainError> {
    Ok(ExhibitionArtwork::find()
        .filter(exhibition_artwork::Column::ExhibitionId.eq(exhibition_id))
        .order_by_asc(exhibition_artwork::Column::DisplayOrder)
        .all(db)
        .await?
        .into_iter()
        .map(|row| row.artwork_id)
        .collect())
}

async fn detail(
    state: &AppState,
    exhibition: exhibition_model::Model,
) -> Result<ExhibitionDetail, DomainError> {
    let ids = ordered_artwork_ids(state.db(), exhibition.id).await?;
    let artworks = artwork_service::find_in_order(state, &ids).await?;
    Ok(ExhibitionDetail {
        exhibition,
        artworks,
    })
}

/// Exhibition page by slug; `None` when no exhibition has it.
pub async fn get_exhibition_by_slug(
    state: &AppState,
    slug: &str,
) -> Result<Option<ExhibitionDetail>, DomainError> {
    let slug = slug.to_string();
    let key = QueryKey::new(EXHIBITIONS).param("slug").param(&slug);
    let state_for_load = state.clone();
    state
        .cache
        .fetch(key, move || async move {
            let found = Exhibition::find()
                .filter(exhibition_model::Column::Slug.eq(slug))
                .one(state_for_load.db())
                .await?;
            match found {
                Some(exhibition) => Ok(Some(detail(&state_for_load, exhibition).await?)),
                None => Ok(None),
            }
        })
        .await
}

pub async fn get_exhibition(state: &AppState, id: i32) -> Result<ExhibitionDetail, DomainError> {
    let key = QueryKey::new(EXHIBITIONS).param("id").param(id);
    let state_for_load = state.clone();
    state
        .cache
        .fetch(key, move || async move {
            let exhibition = Exhibition::find_by_id(id)
                .one(state_for_load.db())
                .await?
                .ok_or(DomainError::NotFound)?;
            detail(&state_for_load, exhibition).await
        })
        .await
}

fn validate(input: ExhibitionInput) -> Result<(ExhibitionInput, String), DomainError> {
    let title = required("title", &input.title)?;
    let slug = resolve_slug(input.slug.clone(), &title)?;
    let start_date = optional(input.start_date);
    let end_date = optional(input.end_date);
    if let (Some(start), Some(end)) = (&start_date, &end_date)
        && end < start
    {
        return Err(DomainError::validation("end_date must not be before start_date"));
    }

    Ok((
        ExhibitionInput {
            title,
            slug: None,
            description: optional(input.description),
            location: optional(input.location),
            image_url: optional_url("image_url", input.image_url)?,
            start_date,
            end_date,
            status: input.status,
        },
        slug,
    ))
}

pub async fn create_exhibition(
    state: &AppState,
    input: ExhibitionInput,
) -> Result<exhibition_model::Model, DomainError> {
    let (input, slug) = validate(input)?;
    let now = chrono::Utc::now().to_rfc3339();

    let model = exhibition_model::ActiveModel {
        title: Set(input.title),
        slug: Set(slug.clone()),
        description: Set(input.description),
        location: Set(input.location),
        image_url: Set(input.image_url),
        start_date: Set(input.start_date),
        end_date: Set(input.end_date),
        status: Set(input.status),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(state.db())
    .await
    .map_err(|e| slug_conflict(e, &slug))?;

    tracing::info!("Created exhibition {} ({})", model.id, model.slug);
    state.cache.invalidate(&QueryKey::new(EXHIBITIONS));
    Ok(model)
}

pub async fn update_exhibition(
    state: &AppState,
    id: i32,
    input: ExhibitionInput,
) -> Result<exhibition_model::Model, DomainError> {
    let (input, slug) = validate(input)?;
    let existing = Exhibition::find_by_id(id)
        .one(state.db())
        .await?
        .ok_or(DomainError::NotFound)?;

    let mut active: exhibition_model::ActiveModel = existing.into();
    active.title = Set(input.title);
    active.slug = Set(slug.clone());
    active.description = Set(input.description);
    active.location = Set(input.location);
    active.image_url = Set(input.image_url);
    active.start_date = Set(input.start_date);
    active.end_date = Set(input.end_date);
    active.status = Set(input.status);
    active.updated_at = Set(chrono::Utc::now().to_rfc3339());
    let model = active
        .update(state.db())
        .await
        .map_err(|e| slug_conflict(e, &slug))?;

    tracing::info!("Updated exhibition {}", id);
    state.cache.invalidate(&QueryKey::new(EXHIBITIONS));
    Ok(model)
}

pub async fn delete_exhibition(state: &AppState, id: i32) -> Result<(), DomainError> {
    let result = Exhibition::delete_by_id(id).exec(state.db()).await?;
    if result.rows_affected == 0 {
        return Err(DomainError::NotFound);
    }
    tracing::info!("Deleted exhibition {}", id);
    state.cache.invalidate(&QueryKey::new(EXHIBITIONS));
    Ok(())
}

/// Replace the exhibition's artworks. Array position becomes `display_order`.
pub async fn set_exhibition_artworks(
    state: &AppState,
    id: i32,
    artwork_ids: Vec<i32>,
) -> Result<ExhibitionDetail, DomainError> {
    let mut ids: Vec<i32> = Vec::with_capacity(artwork_ids.len());
    for artwork_id in artwork_ids {
        if !ids.contains(&artwork_id) {
            ids.push(artwork_id);
        }
    }

    let exhibition = Exhibition::find_by_id(id)
        .one(state.db())
        .await?
        .ok_or(DomainError::NotFound)?;

    let known = state.artwork_repo.find_by_ids(&ids).await?;
    if let Some(missing) = ids.iter().find(|id| !known.iter().any(|a| a.id == **id)) {
        return Err(DomainError::validation(format!(
            "artwork {} does not exist",
            missing
        )));
    }

    let txn = state.db().begin().await?;
    ExhibitionArtwork::delete_many()
        .filter(exhibition_artwork::Column::ExhibitionId.eq(id))
        .exec(&txn)
        .await?;
    for (position, artwork_id) in ids.iter().enumerate() {
        ExhibitionArtwork::insert(exhibition_artwork::ActiveModel {
            exhibition_id: Set(id),
            artwork_id: Set(*artwork_id),
            display_order: Set(position as i32),
        })
        .exec_without_returning(&txn)
        .await?;
    }
    txn.commit().await?;

    tracing::info!("Exhibition {} now shows {} artwork(s)", id, ids.len());
    state.cache.invalidate(&QueryKey::new(EXHIBITIONS));
    detail(state, exhibition).await
}
