//! Journal Service - essays, features and interview write-ups

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::Deserialize;

use super::keys::JOURNAL;
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::infrastructure::cache::QueryKey;
use crate::models::journal_entry::{self as journal_model, Entity as JournalEntry};
use crate::models::{JournalCategory, PublishStatus};
use crate::utils::text::{optional, optional_url, required, slugify};

/// Filter parameters for the public journal listing
#[derive(Debug, Default, Clone, Deserialize)]
pub struct JournalFilter {
    pub category: Option<JournalCategory>,
    pub featured: Option<bool>,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JournalInput {
    pub title: String,
    /// Derived from the title when absent
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub author_name: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: JournalCategory,
    #[serde(default)]
    pub status: PublishStatus,
    #[serde(default)]
    pub featured: bool,
    pub published_at: Option<String>,
}

/// Resolve the slug for a write: explicit slug wins, otherwise the title's.
pub(crate) fn resolve_slug(explicit: Option<String>, title: &str) -> Result<String, DomainError> {
    let source = optional(explicit).unwrap_or_else(|| title.to_string());
    let slug = slugify(&source);
    if slug.is_empty() {
        Err(DomainError::validation("slug must contain letters or digits"))
    } else {
        Ok(slug)
    }
}

/// Map a unique-slug violation to a readable conflict.
pub(crate) fn slug_conflict(err: sea_orm::DbErr, slug: &str) -> DomainError {
    match DomainError::from(err) {
        DomainError::Conflict(_) => DomainError::Conflict(format!("slug '{}' is already in use", slug)),
        other => other,
    }
}

async fn load_published(
    db: &DatabaseConnection,
    filter: JournalFilter,
) -> Result<Vec<journal_model::Model>, DomainError> {
    let mut query =
        JournalEntry::find().filter(journal_model::Column::Status.eq(PublishStatus::Published));

    if let Some(category) = filter.category {
        query = query.filter(journal_model::Column::Category.eq(category));
    }
    if let Some(featured) = filter.featured {
        query = query.filter(journal_model::Column::Featured.eq(featured));
    }
    if let Some(limit) = filter.limit {
        query = query.limit(limit);
    }

    Ok(query
        .order_by_desc(journal_model::Column::PublishedAt)
        .order_by_desc(journal_model::Column::Id)
        .all(db)
        .await?)
}

/// Published entries, newest first
pub async fn list_published(
    state: &AppState,
    filter: JournalFilter,
) -> Result<Vec<journal_model::Model>, DomainError> {
    let key = QueryKey::new(JOURNAL)
        .param("published")
        .param(filter.category.map(|c| format!("{:?}", c)).unwrap_or_default())
        .param(filter.featured.map(|f| f.to_string()).unwrap_or_default())
        .param(filter.limit.map(|l| l.to_string()).unwrap_or_default());

    let db = state.db().clone();
    state
        .cache
        .fetch(key, move || async move { load_published(&db, filter).await })
        .await
}

/// Every entry, drafts included
pub async fn list_all(state: &AppState) -> Result<Vec<journal_model::Model>, DomainError> {
    let db = state.db().clone();
    state
        .cache
        .fetch(QueryKey::new(JOURNAL).param("all"), move || async move {
            Ok(JournalEntry::find()
                .order_by_desc(journal_model::Column::UpdatedAt)
                .all(&db)
                .await?)
        })
        .await
}

/// A published entry by slug. Missing and draft entries are `None`.
pub async fn get_journal_entry_by_slug(
    state: &AppState,
    slug: &str,
) -> Result<Option<journal_model::Model>, DomainError> {
    let db = state.db().clone();
    let slug = slug.to_string();
    state
        .cache
        .fetch(QueryKey::new(JOURNAL).param("slug").param(&slug), move || async move {
            Ok(JournalEntry::find()
                .filter(journal_model::Column::Slug.eq(slug))
                .filter(journal_model::Column::Status.eq(PublishStatus::Published))
                .one(&db)
                .await?)
        })
        .await
}

pub async fn get_journal_entry(
    state: &AppState,
    id: i32,
) -> Result<journal_model::Model, DomainError> {
    let db = state.db().clone();
    state
        .cache
        .fetch(QueryKey::new(JOURNAL).param("id").param(id), move || async move {
            JournalEntry::find_by_id(id)
                .one(&db)
                .await?
                .ok_or(DomainError::NotFound)
        })
        .await
}

struct ValidJournal {
    input: JournalInput,
    slug: String,
}

fn validate(input: JournalInput) -> Result<ValidJournal, DomainError> {
    let title = required("title", &input.title)?;
    let slug = resolve_slug(input.slug.clone(), &title)?;
    Ok(ValidJournal {
        slug,
        input: JournalInput {
            title,
            slug: None,
            excerpt: optional(input.excerpt),
            content: optional(input.content),
            author_name: optional(input.author_name),
            image_url: optional_url("image_url", input.image_url)?,
            published_at: optional(input.published_at),
            ..input
        },
    })
}

/// Publishing without a date stamps the current time.
fn publication_date(status: PublishStatus, given: Option<String>) -> Option<String> {
    match (status, given) {
        (_, Some(date)) => Some(date),
        (PublishStatus::Published, None) => Some(chrono::Utc::now().to_rfc3339()),
        (PublishStatus::Draft, None) => None,
    }
}

pub async fn create_journal_entry(
    state: &AppState,
    input: JournalInput,
) -> Result<journal_model::Model, DomainError> {
    let ValidJournal { input, slug } = validate(input)?;
    let now = chrono::Utc::now().to_rfc3339();

    let model = journal_model::ActiveModel {
        title: Set(input.title),
        slug: Set(slug.clone()),
        excerpt: Set(input.excerpt),
        content: Set(input.content),
        author_name: Set(input.author_name),
        image_url: Set(input.image_url),
        category: Set(input.category),
        status: Set(input.status),
        featured: Set(input.featured),
        published_at: Set(publication_date(input.status, input.published_at)),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(state.db())
    .await
    .map_err(|e| slug_conflict(e, &slug))?;

    tracing::info!("Created journal entry {} ({})", model.id, model.slug);
    state.cache.invalidate(&QueryKey::new(JOURNAL));
    Ok(model)
}

pub async fn update_journal_entry(
    state: &AppState,
    id: i32,
    input: JournalInput,
) -> Result<journal_model::Model, DomainError> {
    let ValidJournal { input, slug } = validate(input)?;
    let existing = JournalEntry::find_by_id(id)
        .one(state.db())
        .await?
        .ok_or(DomainError::NotFound)?;

    let published_at = publication_date(input.status, input.published_at.or(existing.published_at.clone()));
    let mut active: journal_model::ActiveModel = existing.into();
    active.title = Set(input.title);
    active.slug = Set(slug.clone());
    active.excerpt = Set(input.excerpt);
    active.content = Set(input.content);
    active.author_name = Set(input.author_name);
    active.image_url = Set(input.image_url);
    active.category = Set(input.category);
    active.status = Set(input.status);
    active.featured = Set(input.featured);
    active.published_at = Set(published_at);
    active.updated_at = Set(chrono::Utc::now().to_rfc3339());

    let model = active
        .update(state.db())
        .await
        .map_err(|e| slug_conflict(e, &slug))?;

    tracing::info!("Updated journal entry {}", id);
    state.cache.invalidate(&QueryKey::new(JOURNAL));
    Ok(model)
}

pub async fn delete_journal_entry(state: &AppState, id: i32) -> Result<(), DomainError> {
    let result = JournalEntry::delete_by_id(id).exec(state.db()).await?;
    if result.rows_affected == 0 {
        return Err(DomainError::NotFound);
    }
    tracing::info!("Deleted journal entry {}", id);
    state.cache.invalidate(&QueryKey::new(JOURNAL));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_falls_back_to_title() {
        assert_eq!(resolve_slug(None, "On Light").unwrap(), "on-light");
        assert_eq!(resolve_slug(Some("  ".into()), "On Light").unwrap(), "on-light");
        assert_eq!(resolve_slug(Some("Custom Slug".into()), "x").unwrap(), "custom-slug");
        assert!(resolve_slug(None, "???").is_err());
    }

    #[test]
    fn publishing_stamps_a_date() {
        assert!(publication_date(PublishStatus::Published, None).is_some());
        assert_eq!(publication_date(PublishStatus::Draft, None), None);
        assert_eq!(
            publication_date(PublishStatus::Draft, Some("2024-01-01".into())),
            Some("2024-01-01".to_string())
        );
    }
}
