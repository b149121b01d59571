use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::domain::{Artwork, ArtworkFilter, DomainError};
use crate::infrastructure::AppState;
use crate::infrastructure::session::OptionalSession;
use crate::services::artwork_service;

#[utoipa::path(
    get,
    path = "/api/artworks",
    params(
        ("artist_id" = Option<i32>, Query, description = "Only this artist's works"),
        ("collection_id" = Option<i32>, Query, description = "Only works in this collection"),
        ("featured" = Option<bool>, Query, description = "Featured works only"),
        ("medium" = Option<String>, Query, description = "Exact medium"),
        ("limit" = Option<u64>, Query, description = "Maximum number of rows")
    ),
    responses((status = 200, description = "Artworks, newest first"))
)]
pub async fn list_artworks(
    State(state): State<AppState>,
    Query(filter): Query<ArtworkFilter>,
) -> Result<Json<Vec<Artwork>>, DomainError> {
    Ok(Json(artwork_service::list_artworks(&state, filter).await?))
}

#[utoipa::path(
    get,
    path = "/api/artworks/{id}",
    params(("id" = i32, Path, description = "Artwork ID")),
    responses(
        (status = 200, description = "The artwork"),
        (status = 404, description = "No such artwork")
    )
)]
pub async fn get_artwork(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Artwork>, DomainError> {
    Ok(Json(artwork_service::get_artwork(&state, id).await?))
}

/// Views are only recorded for signed-in visitors; anonymous calls are accepted and ignored.
pub async fn record_view(
    State(state): State<AppState>,
    OptionalSession(session): OptionalSession,
    Path(id): Path<i32>,
) -> Result<StatusCode, DomainError> {
    match session.user_id() {
        Some(user_id) => {
            artwork_service::record_view(&state, user_id, id).await?;
            Ok(StatusCode::NO_CONTENT)
        }
        None => Ok(StatusCode::ACCEPTED),
    }
}
