use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::models::journal_entry;
use crate::services::journal_service::{self, JournalFilter};

pub async fn list_journal(
    State(state): State<AppState>,
    Query(filter): Query<JournalFilter>,
) -> Result<Json<Vec<journal_entry::Model>>, DomainError> {
    Ok(Json(journal_service::list_published(&state, filter).await?))
}

pub async fn get_journal_entry(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<journal_entry::Model>, DomainError> {
    journal_service::get_journal_entry_by_slug(&state, &slug)
        .await?
        .map(Json)
        .ok_or(DomainError::NotFound)
}
