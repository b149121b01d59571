//! Follow Service - artists a user keeps up with

use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use std::collections::HashMap;

use super::artist_service;
use super::keys::{FOLLOWS, RECOMMENDATIONS};
use crate::domain::{Artist, DomainError};
use crate::infrastructure::AppState;
use crate::infrastructure::cache::QueryKey;
use crate::models::artist_follow::{self, Entity as ArtistFollow};

async fn load_is_following(
    db: &sea_orm::DatabaseConnection,
    user_id: i32,
    artist_id: i32,
) -> Result<bool, DomainError> {
    let count = ArtistFollow::find()
        .filter(artist_follow::Column::UserId.eq(user_id))
        .filter(artist_follow::Column::ArtistId.eq(artist_id))
        .count(db)
        .await?;
    Ok(count > 0)
}

pub async fn is_following(state: &AppState, user_id: i32, artist_id: i32) -> Result<bool, DomainError> {
    let db = state.db().clone();
    state
        .cache
        .fetch(
            QueryKey::new(FOLLOWS).param("is").param(artist_id).for_user(user_id),
            move || async move { load_is_following(&db, user_id, artist_id).await },
        )
        .await
}

/// Put the follow in the requested state. Repeating a call changes nothing.
pub async fn set_follow(
    state: &AppState,
    user_id: i32,
    artist_id: i32,
    on: bool,
) -> Result<bool, DomainError> {
    if on {
        artist_service::get_artist(state, artist_id).await?;
        ArtistFollow::insert(artist_follow::ActiveModel {
            user_id: Set(user_id),
            artist_id: Set(artist_id),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
        })
        .on_conflict(
            OnConflict::columns([artist_follow::Column::UserId, artist_follow::Column::ArtistId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(state.db())
        .await?;
    } else {
        ArtistFollow::delete_many()
            .filter(artist_follow::Column::UserId.eq(user_id))
            .filter(artist_follow::Column::ArtistId.eq(artist_id))
            .exec(state.db())
            .await?;
    }
    tracing::debug!(user_id, artist_id, on, "follow set");

    state.cache.invalidate(&QueryKey::new(FOLLOWS).for_user(user_id));
    state
        .cache
        .invalidate(&QueryKey::new(FOLLOWS).param("count").param(artist_id));
    state.cache.invalidate(&QueryKey::new(RECOMMENDATIONS).for_user(user_id));
    Ok(on)
}

pub async fn toggle_follow(state: &AppState, user_id: i32, artist_id: i32) -> Result<bool, DomainError> {
    let current = load_is_following(state.db(), user_id, artist_id).await?;
    set_follow(state, user_id, artist_id, !current).await
}

/// Followed artists, most recent follow first
pub async fn list_followed_artists(state: &AppState, user_id: i32) -> Result<Vec<Artist>, DomainError> {
    let state_for_load = state.clone();
    state
        .cache
        .fetch(
            QueryKey::new(FOLLOWS).param("list").for_user(user_id),
            move || async move {
                let follows = ArtistFollow::find()
                    .filter(artist_follow::Column::UserId.eq(user_id))
                    .order_by_desc(artist_follow::Column::CreatedAt)
                    .all(state_for_load.db())
                    .await?;

                let mut by_id: HashMap<i32, Artist> = state_for_load
                    .artist_repo
                    .find_all()
                    .await?
                    .into_iter()
                    .map(|a| (a.id, a))
                    .collect();
                Ok(follows
                    .into_iter()
                    .filter_map(|f| by_id.remove(&f.artist_id))
                    .collect())
            },
        )
        .await
}

pub async fn follower_count(state: &AppState, artist_id: i32) -> Result<u64, DomainError> {
    let db = state.db().clone();
    state
        .cache
        .fetch(
            QueryKey::new(FOLLOWS).param("count").param(artist_id),
            move || async move {
                Ok(ArtistFollow::find()
                    .filter(artist_follow::Column::ArtistId.eq(artist_id))
                    .count(&db)
                    .await?)
            },
        )
        .await
}
