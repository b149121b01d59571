use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::models::{ExhibitionStatus, exhibition};
use crate::services::exhibition_service::{self, ExhibitionDetail};

#[derive(Debug, Deserialize)]
pub struct ExhibitionQuery {
    pub status: Option<ExhibitionStatus>,
}

pub async fn list_exhibitions(
    State(state): State<AppState>,
    Query(query): Query<ExhibitionQuery>,
) -> Result<Json<Vec<exhibition::Model>>, DomainError> {
    Ok(Json(
        exhibition_service::list_exhibitions(&state, query.status).await?,
    ))
}

pub async fn get_exhibition(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ExhibitionDetail>, DomainError> {
    exhibition_service::get_exhibition_by_slug(&state, &slug)
        .await?
        .map(Json)
        .ok_or(DomainError::NotFound)
}
