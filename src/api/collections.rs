use axum::{
    Json,
    extract::{Path, State},
};

use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::services::collection_service::{self, CollectionDetail, CollectionDto};

pub async fn list_collections(
    State(state): State<AppState>,
) -> Result<Json<Vec<CollectionDto>>, DomainError> {
    Ok(Json(collection_service::list_collections(&state).await?))
}

pub async fn get_collection(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CollectionDetail>, DomainError> {
    Ok(Json(
        collection_service::get_published_collection(&state, id).await?,
    ))
}
