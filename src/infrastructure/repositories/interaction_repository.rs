//! SeaORM implementation of InteractionRepository

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

use crate::domain::{DomainError, InteractionRepository};
use crate::models::{artwork_view, favorite};

/// SeaORM-based implementation of InteractionRepository
pub struct SeaOrmInteractionRepository {
    db: DatabaseConnection,
}

impl SeaOrmInteractionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl InteractionRepository for SeaOrmInteractionRepository {
    async fn favorite_artwork_ids(&self, user_id: i32) -> Result<Vec<i32>, DomainError> {
        let rows = favorite::Entity::find()
            .filter(favorite::Column::UserId.eq(user_id))
            .order_by_desc(favorite::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|f| f.artwork_id).collect())
    }

    async fn viewed_artwork_ids(&self, user_id: i32) -> Result<Vec<i32>, DomainError> {
        let rows = artwork_view::Entity::find()
            .filter(artwork_view::Column::UserId.eq(user_id))
            .order_by_desc(artwork_view::Column::ViewedAt)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|v| v.artwork_id).collect())
    }

    async fn is_favorite(&self, user_id: i32, artwork_id: i32) -> Result<bool, DomainError> {
        let count = favorite::Entity::find()
            .filter(favorite::Column::UserId.eq(user_id))
            .filter(favorite::Column::ArtworkId.eq(artwork_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn set_favorite(
        &self,
        user_id: i32,
        artwork_id: i32,
        on: bool,
    ) -> Result<(), DomainError> {
        if on {
            let row = favorite::ActiveModel {
                user_id: Set(user_id),
                artwork_id: Set(artwork_id),
                created_at: Set(chrono::Utc::now().to_rfc3339()),
            };
            // Already favorited is a no-op
            favorite::Entity::insert(row)
                .on_conflict(
                    OnConflict::columns([favorite::Column::UserId, favorite::Column::ArtworkId])
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(&self.db)
                .await?;
        } else {
            favorite::Entity::delete_many()
                .filter(favorite::Column::UserId.eq(user_id))
                .filter(favorite::Column::ArtworkId.eq(artwork_id))
                .exec(&self.db)
                .await?;
        }
        Ok(())
    }

    async fn record_view(&self, user_id: i32, artwork_id: i32) -> Result<(), DomainError> {
        let row = artwork_view::ActiveModel {
            user_id: Set(user_id),
            artwork_id: Set(artwork_id),
            viewed_at: Set(chrono::Utc::now().to_rfc3339()),
        };
        artwork_view::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([
                    artwork_view::Column::UserId,
                    artwork_view::Column::ArtworkId,
                ])
                .update_column(artwork_view::Column::ViewedAt)
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }
}
