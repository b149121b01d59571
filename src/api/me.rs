//! Routes for the signed-in visitor: dashboard, profile, favorites,
//! follows, personal collections and recommendations.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

use crate::domain::{Artist, Artwork, DomainError};
use crate::infrastructure::AppState;
use crate::infrastructure::session::UserSession;
use crate::services::profile_service::{self, ProfileDto, ProfileInput};
use crate::services::site_service::{self, Dashboard};
use crate::services::user_collection_service::{
    self, UserCollectionDetail, UserCollectionDto, UserCollectionInput,
};
use crate::services::{favorite_service, follow_service, recommendation_service};

pub async fn dashboard(
    State(state): State<AppState>,
    session: UserSession,
) -> Result<Json<Dashboard>, DomainError> {
    Ok(Json(site_service::dashboard(&state, session.user_id()).await?))
}

pub async fn get_profile(
    State(state): State<AppState>,
    session: UserSession,
) -> Result<Json<ProfileDto>, DomainError> {
    Ok(Json(
        profile_service::get_profile(&state, session.user_id()).await?,
    ))
}

pub async fn update_profile(
    State(state): State<AppState>,
    session: UserSession,
    Json(payload): Json<ProfileInput>,
) -> Result<Json<ProfileDto>, DomainError> {
    Ok(Json(
        profile_service::update_profile(&state, session.user_id(), payload).await?,
    ))
}

pub async fn recommendations(
    State(state): State<AppState>,
    session: UserSession,
) -> Result<Json<Vec<Artwork>>, DomainError> {
    Ok(Json(
        recommendation_service::get_recommendations(&state, session.user_id()).await?,
    ))
}

// Favorites

pub async fn list_favorites(
    State(state): State<AppState>,
    session: UserSession,
) -> Result<Json<Vec<Artwork>>, DomainError> {
    Ok(Json(
        favorite_service::list_favorites(&state, session.user_id()).await?,
    ))
}

pub async fn favorite_status(
    State(state): State<AppState>,
    session: UserSession,
    Path(artwork_id): Path<i32>,
) -> Result<Json<Value>, DomainError> {
    let on = favorite_service::is_favorite(&state, session.user_id(), artwork_id).await?;
    Ok(Json(json!({ "artwork_id": artwork_id, "favorite": on })))
}

pub async fn add_favorite(
    State(state): State<AppState>,
    session: UserSession,
    Path(artwork_id): Path<i32>,
) -> Result<Json<Value>, DomainError> {
    let on = favorite_service::set_favorite(&state, session.user_id(), artwork_id, true).await?;
    Ok(Json(json!({ "artwork_id": artwork_id, "favorite": on })))
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    session: UserSession,
    Path(artwork_id): Path<i32>,
) -> Result<Json<Value>, DomainError> {
    let on = favorite_service::set_favorite(&state, session.user_id(), artwork_id, false).await?;
    Ok(Json(json!({ "artwork_id": artwork_id, "favorite": on })))
}

pub async fn toggle_favorite(
    State(state): State<AppState>,
    session: UserSession,
    Path(artwork_id): Path<i32>,
) -> Result<Json<Value>, DomainError> {
    let on = favorite_service::toggle_favorite(&state, session.user_id(), artwork_id).await?;
    Ok(Json(json!({ "artwork_id": artwork_id, "favorite": on })))
}

// Follows

pub async fn list_follows(
    State(state): State<AppState>,
    session: UserSession,
) -> Result<Json<Vec<Artist>>, DomainError> {
    Ok(Json(
        follow_service::list_followed_artists(&state, session.user_id()).await?,
    ))
}

pub async fn follow_status(
    State(state): State<AppState>,
    session: UserSession,
    Path(artist_id): Path<i32>,
) -> Result<Json<Value>, DomainError> {
    let on = follow_service::is_following(&state, session.user_id(), artist_id).await?;
    Ok(Json(json!({ "artist_id": artist_id, "following": on })))
}

pub async fn follow(
    State(state): State<AppState>,
    session: UserSession,
    Path(artist_id): Path<i32>,
) -> Result<Json<Value>, DomainError> {
    let on = follow_service::set_follow(&state, session.user_id(), artist_id, true).await?;
    Ok(Json(json!({ "artist_id": artist_id, "following": on })))
}

pub async fn unfollow(
    State(state): State<AppState>,
    session: UserSession,
    Path(artist_id): Path<i32>,
) -> Result<Json<Value>, DomainError> {
    let on = follow_service::set_follow(&state, session.user_id(), artist_id, false).await?;
    Ok(Json(json!({ "artist_id": artist_id, "following": on })))
}

pub async fn toggle_follow(
    State(state): State<AppState>,
    session: UserSession,
    Path(artist_id): Path<i32>,
) -> Result<Json<Value>, DomainError> {
    let on = follow_service::toggle_follow(&state, session.user_id(), artist_id).await?;
    Ok(Json(json!({ "artist_id": artist_id, "following": on })))
}

// Personal collections

pub async fn list_collections(
    State(state): State<AppState>,
    session: UserSession,
) -> Result<Json<Vec<UserCollectionDto>>, DomainError> {
    Ok(Json(
        user_collection_service::list_user_collections(&state, session.user_id()).await?,
    ))
}

pub async fn create_collection(
    State(state): State<AppState>,
    session: UserSession,
    Json(payload): Json<UserCollectionInput>,
) -> Result<(StatusCode, Json<UserCollectionDto>), DomainError> {
    let created =
        user_collection_service::create_user_collection(&state, session.user_id(), payload)
            .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_collection(
    State(state): State<AppState>,
    session: UserSession,
    Path(id): Path<i32>,
) -> Result<Json<UserCollectionDetail>, DomainError> {
    Ok(Json(
        user_collection_service::get_user_collection(&state, session.user_id(), id).await?,
    ))
}

pub async fn update_collection(
    State(state): State<AppState>,
    session: UserSession,
    Path(id): Path<i32>,
    Json(payload): Json<UserCollectionInput>,
) -> Result<Json<UserCollectionDto>, DomainError> {
    Ok(Json(
        user_collection_service::update_user_collection(&state, session.user_id(), id, payload)
            .await?,
    ))
}

pub async fn delete_collection(
    State(state): State<AppState>,
    session: UserSession,
    Path(id): Path<i32>,
) -> Result<StatusCode, DomainError> {
    user_collection_service::delete_user_collection(&state, session.user_id(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_collection_artwork(
    State(state): State<AppState>,
    session: UserSession,
    Path((id, artwork_id)): Path<(i32, i32)>,
) -> Result<StatusCode, DomainError> {
    user_collection_service::add_artwork(&state, session.user_id(), id, artwork_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove_collection_artwork(
    State(state): State<AppState>,
    session: UserSession,
    Path((id, artwork_id)): Path<(i32, i32)>,
) -> Result<StatusCode, DomainError> {
    user_collection_service::remove_artwork(&state, session.user_id(), id, artwork_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
