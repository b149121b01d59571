//! Interview Service - long-form conversations with artists

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Select,
    Set,
};
use serde::{Deserialize, Serialize};

use super::journal_service::{resolve_slug, slug_conflict};
use super::keys::INTERVIEWS;
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::infrastructure::cache::QueryKey;
use crate::models::PublishStatus;
use crate::models::artist;
use crate::models::interview::{self as interview_model, Entity as Interview};
use crate::utils::text::{optional, optional_url, required};

/// Interview DTO with the artist's name joined in
#[derive(Debug, Clone, Serialize)]
pub struct InterviewDto {
    pub id: i32,
    pub artist_id: i32,
    pub artist_name: Option<String>,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub interview_date: Option<String>,
    pub status: PublishStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl From<(interview_model::Model, Option<artist::Model>)> for InterviewDto {
    fn from((model, artist): (interview_model::Model, Option<artist::Model>)) -> Self {
        Self {
            id: model.id,
            artist_id: model.artist_id,
            artist_name: artist.map(|a| a.name),
            title: model.title,
            slug: model.slug,
            excerpt: model.excerpt,
            content: model.content,
            image_url: model.image_url,
            interview_date: model.interview_date,
            status: model.status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InterviewInput {
    pub artist_id: i32,
    pub title: String,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub interview_date: Option<String>,
    #[serde(default)]
    pub status: PublishStatus,
}

async fn load(
    db: &DatabaseConnection,
    query: Select<Interview>,
) -> Result<Vec<InterviewDto>, DomainError> {
    let rows = query
        .find_also_related(artist::Entity)
        .order_by_desc(interview_model::Column::InterviewDate)
        .order_by_desc(interview_model::Column::Id)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(InterviewDto::from).collect())
}

/// Published interviews, most recent first
pub async fn list_interviews(state: &AppState) -> Result<Vec<InterviewDto>, DomainError> {
    let db = state.db().clone();
    state
        .cache
        .fetch(QueryKey::new(INTERVIEWS).param("published"), move || async move {
            load(
                &db,
                Interview::find()
                    .filter(interview_model::Column::Status.eq(PublishStatus::Published)),
            )
            .await
        })
        .await
}

pub async fn list_all_interviews(state: &AppState) -> Result<Vec<InterviewDto>, DomainError> {
    let db = state.db().clone();
    state
        .cache
        .fetch(QueryKey::new(INTERVIEWS).param("all"), move || async move {
            load(&db, Interview::find()).await
        })
        .await
}

/// A published interview by slug; `None` when missing or still a draft.
pub async fn get_interview_by_slug(
    state: &AppState,
    slug: &str,
) -> Result<Option<InterviewDto>, DomainError> {
    let db = state.db().clone();
    let slug = slug.to_string();
    state
        .cache
        .fetch(QueryKey::new(INTERVIEWS).param("slug").param(&slug), move || async move {
            let found = load(
                &db,
                Interview::find()
                    .filter(interview_model::Column::Slug.eq(slug))
                    .filter(interview_model::Column::Status.eq(PublishStatus::Published)),
            )
            .await?;
            Ok(found.into_iter().next())
        })
        .await
}

pub async fn get_interview(state: &AppState, id: i32) -> Result<InterviewDto, DomainError> {
    let db = state.db().clone();
    state
        .cache
        .fetch(QueryKey::new(INTERVIEWS).param("id").param(id), move || async move {
            load(&db, Interview::find_by_id(id))
                .await?
                .into_iter()
                .next()
                .ok_or(DomainError::NotFound)
        })
        .await
}

async fn validate(
    db: &DatabaseConnection,
    input: InterviewInput,
) -> Result<(InterviewInput, String), DomainError> {
    let title = required("title", &input.title)?;
    let slug = resolve_slug(input.slug.clone(), &title)?;

    if artist::Entity::find_by_id(input.artist_id).one(db).await?.is_none() {
        return Err(DomainError::validation(format!(
            "artist {} does not exist",
            input.artist_id
        )));
    }

    Ok((
        InterviewInput {
            title,
            slug: None,
            excerpt: optional(input.excerpt),
            content: optional(input.content),
            image_url: optional_url("image_url", input.image_url)?,
            interview_date: optional(input.interview_date),
            ..input
        },
        slug,
    ))
}

pub async fn create_interview(
    state: &AppState,
    input: InterviewInput,
) -> Result<InterviewDto, DomainError> {
    let (input, slug) = validate(state.db(), input).await?;
    let now = chrono::Utc::now().to_rfc3339();

    let model = interview_model::ActiveModel {
        artist_id: Set(input.artist_id),
        title: Set(input.title),
        slug: Set(slug.clone()),
        excerpt: Set(input.excerpt),
        content: Set(input.content),
        image_url: Set(input.image_url),
        interview_date: Set(input.interview_date),
        status: Set(input.status),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(state.db())
    .await
    .map_err(|e| slug_conflict(e, &slug))?;

    tracing::info!("Created interview {} ({})", model.id, model.slug);
    state.cache.invalidate(&QueryKey::new(INTERVIEWS));
    get_interview(state, model.id).await
}

pub async fn update_interview(
    state: &AppState,
    id: i32,
    input: InterviewInput,
) -> Result<InterviewDto, DomainError> {
    let existing = Interview::find_by_id(id)
        .one(state.db())
        .await?
        .ok_or(DomainError::NotFound)?;
    let (input, slug) = validate(state.db(), input).await?;

    let mut active: interview_model::ActiveModel = existing.into();
    active.artist_id = Set(input.artist_id);
    active.title = Set(input.title);
    active.slug = Set(slug.clone());
    active.excerpt = Set(input.excerpt);
    active.content = Set(input.content);
    active.image_url = Set(input.image_url);
    active.interview_date = Set(input.interview_date);
    active.status = Set(input.status);
    active.updated_at = Set(chrono::Utc::now().to_rfc3339());
    active
        .update(state.db())
        .await
        .map_err(|e| slug_conflict(e, &slug))?;

    tracing::info!("Updated interview {}", id);
    state.cache.invalidate(&QueryKey::new(INTERVIEWS));
    get_interview(state, id).await
}

pub async fn delete_interview(state: &AppState, id: i32) -> Result<(), DomainError> {
    let result = Interview::delete_by_id(id).exec(state.db()).await?;
    if result.rows_affected == 0 {
        return Err(DomainError::NotFound);
    }
    tracing::info!("Deleted interview {}", id);
    state.cache.invalidate(&QueryKey::new(INTERVIEWS));
    Ok(())
}
