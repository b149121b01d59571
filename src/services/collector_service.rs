//! Collector Service - profiles of featured collectors

use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::Deserialize;

use super::keys::COLLECTORS;
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::infrastructure::cache::QueryKey;
use crate::models::collector::{self as collector_model, Entity as Collector};
use crate::utils::text::{optional, optional_url, required};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectorInput {
    pub name: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub website_url: Option<String>,
    pub featured_quote: Option<String>,
}

pub async fn list_collectors(state: &AppState) -> Result<Vec<collector_model::Model>, DomainError> {
    let db = state.db().clone();
    state
        .cache
        .fetch(QueryKey::new(COLLECTORS), move || async move {
            Ok(Collector::find()
                .order_by_asc(collector_model::Column::Name)
                .all(&db)
                .await?)
        })
        .await
}

pub async fn get_collector(state: &AppState, id: i32) -> Result<collector_model::Model, DomainError> {
    let db = state.db().clone();
    state
        .cache
        .fetch(QueryKey::new(COLLECTORS).param(id), move || async move {
            Collector::find_by_id(id)
                .one(&db)
                .await?
                .ok_or(DomainError::NotFound)
        })
        .await
}

fn validate(input: CollectorInput) -> Result<CollectorInput, DomainError> {
    Ok(CollectorInput {
        name: required("name", &input.name)?,
        bio: optional(input.bio),
        location: optional(input.location),
        image_url: optional_url("image_url", input.image_url)?,
        website_url: optional_url("website_url", input.website_url)?,
        featured_quote: optional(input.featured_quote),
    })
}

pub async fn create_collector(
    state: &AppState,
    input: CollectorInput,
) -> Result<collector_model::Model, DomainError> {
    let input = validate(input)?;
    let now = chrono::Utc::now().to_rfc3339();

    let model = collector_model::ActiveModel {
        name: Set(input.name),
        bio: Set(input.bio),
        location: Set(input.location),
        image_url: Set(input.image_url),
        website_url: Set(input.website_url),
        featured_quote: Set(input.featured_quote),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(state.db())
    .await?;

    tracing::info!("Created collector {}", model.id);
    state.cache.invalidate(&QueryKey::new(COLLECTORS));
    Ok(model)
}

pub async fn update_collector(
    state: &AppState,
    id: i32,
    input: CollectorInput,
) -> Result<collector_model::Model, DomainError> {
    let input = validate(input)?;
    let existing = Collector::find_by_id(id)
        .one(state.db())
        .await?
        .ok_or(DomainError::NotFound)?;

    let mut active: collector_model::ActiveModel = existing.into();
    active.name = Set(input.name);
    active.bio = Set(input.bio);
    active.location = Set(input.location);
    active.image_url = Set(input.image_url);
    active.website_url = Set(input.website_url);
    active.featured_quote = Set(input.featured_quote);
    active.updated_at = Set(chrono::Utc::now().to_rfc3339());
    let model = active.update(state.db()).await?;

    tracing::info!("Updated collector {}", id);
    state.cache.invalidate(&QueryKey::new(COLLECTORS));
    Ok(model)
}

pub async fn delete_collector(state: &AppState, id: i32) -> Result<(), DomainError> {
    let result = Collector::delete_by_id(id).exec(state.db()).await?;
    if result.rows_affected == 0 {
        return Err(DomainError::NotFound);
    }
    tracing::info!("Deleted collector {}", id);
    state.cache.invalidate(&QueryKey::new(COLLECTORS));
    Ok(())
}
