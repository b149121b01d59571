use axum::{
    Json,
    extract::{Path, State},
};

use crate::domain::{Artist, DomainError};
use crate::infrastructure::AppState;
use crate::services::artist_service::{self, ArtistProfile};

#[utoipa::path(
    get,
    path = "/api/artists",
    responses((status = 200, description = "All artists, by name"))
)]
pub async fn list_artists(State(state): State<AppState>) -> Result<Json<Vec<Artist>>, DomainError> {
    Ok(Json(artist_service::list_artists(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/artists/{id}",
    params(("id" = i32, Path, description = "Artist ID")),
    responses(
        (status = 200, description = "Artist with artworks and follower count"),
        (status = 404, description = "No such artist")
    )
)]
pub async fn get_artist(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ArtistProfile>, DomainError> {
    Ok(Json(artist_service::get_artist_profile(&state, id).await?))
}
