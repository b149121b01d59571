use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::domain::{Artwork, DomainError};
use crate::infrastructure::AppState;
use crate::services::artwork_service;
use crate::services::site_service::{self, AboutInfo, HomeFeed};

pub async fn home(State(state): State<AppState>) -> Result<Json<HomeFeed>, DomainError> {
    Ok(Json(site_service::home_feed(&state).await?))
}

pub async fn about(State(state): State<AppState>) -> Result<Json<AboutInfo>, DomainError> {
    Ok(Json(site_service::about(&state).await?))
}

#[derive(Debug, Deserialize)]
pub struct CompareQuery {
    /// Comma-separated artwork IDs
    #[serde(default)]
    pub ids: String,
}

fn parse_ids(raw: &str) -> Result<Vec<i32>, DomainError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i32>()
                .map_err(|_| DomainError::validation(format!("'{}' is not an artwork id", s)))
        })
        .collect()
}

pub async fn compare(
    State(state): State<AppState>,
    Query(query): Query<CompareQuery>,
) -> Result<Json<Vec<Artwork>>, DomainError> {
    let ids = parse_ids(&query.ids)?;
    Ok(Json(artwork_service::compare_artworks(&state, &ids).await?))
}
