//! SeaORM implementation of ArtistRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::{Artist, ArtistInput, ArtistRepository, DomainError};
use crate::models::artist::{ActiveModel, Column, Entity as ArtistEntity, Model};
use crate::models::artwork;

/// SeaORM-based implementation of ArtistRepository
pub struct SeaOrmArtistRepository {
    db: DatabaseConnection,
}

impl SeaOrmArtistRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<Model> for Artist {
    fn from(a: Model) -> Self {
        Self {
            id: a.id,
            name: a.name,
            bio: a.bio,
            statement: a.statement,
            nationality: a.nationality,
            image_url: a.image_url,
            audio_url: a.audio_url,
            website_url: a.website_url,
            instagram_url: a.instagram_url,
            twitter_url: a.twitter_url,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

fn apply_input(active: &mut ActiveModel, input: ArtistInput) {
    active.name = Set(input.name);
    active.bio = Set(input.bio);
    active.statement = Set(input.statement);
    active.nationality = Set(input.nationality);
    active.image_url = Set(input.image_url);
    active.audio_url = Set(input.audio_url);
    active.website_url = Set(input.website_url);
    active.instagram_url = Set(input.instagram_url);
    active.twitter_url = Set(input.twitter_url);
}

#[async_trait]
impl ArtistRepository for SeaOrmArtistRepository {
    async fn find_all(&self) -> Result<Vec<Artist>, DomainError> {
        let artists = ArtistEntity::find()
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await?;

        Ok(artists.into_iter().map(Artist::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Artist>, DomainError> {
        let artist = ArtistEntity::find_by_id(id).one(&self.db).await?;
        Ok(artist.map(Artist::from))
    }

    async fn create(&self, input: ArtistInput) -> Result<Artist, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let mut artist = ActiveModel {
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        apply_input(&mut artist, input);

        let result = artist.insert(&self.db).await?;
        Ok(Artist::from(result))
    }

    async fn update(&self, id: i32, input: ArtistInput) -> Result<Artist, DomainError> {
        let existing = ArtistEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut artist: ActiveModel = existing.into();
        apply_input(&mut artist, input);
        artist.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let result = artist.update(&self.db).await?;
        Ok(Artist::from(result))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let artworks = artwork::Entity::find()
            .filter(artwork::Column::ArtistId.eq(id))
            .count(&self.db)
            .await?;
        if artworks > 0 {
            return Err(DomainError::Conflict(format!(
                "artist {} still has {} artwork(s)",
                id, artworks
            )));
        }

        let result = ArtistEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        Ok(())
    }
}
