use axum::{
    Json,
    extract::{Path, State},
};

use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::models::collector;
use crate::services::collector_service;

pub async fn list_collectors(
    State(state): State<AppState>,
) -> Result<Json<Vec<collector::Model>>, DomainError> {
    Ok(Json(collector_service::list_collectors(&state).await?))
}

pub async fn get_collector(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<collector::Model>, DomainError> {
    Ok(Json(collector_service::get_collector(&state, id).await?))
}
