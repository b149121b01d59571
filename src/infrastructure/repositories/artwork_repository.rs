//! SeaORM implementation of ArtworkRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set,
};

use crate::domain::{
    Artwork, ArtworkFilter, ArtworkInput, ArtworkRepository, ArtworkTraits, DomainError,
};
use crate::models::artwork::{ActiveModel, Column, Entity as ArtworkEntity, Model};
use crate::models::{artist, collection};

/// SeaORM-based implementation of ArtworkRepository
pub struct SeaOrmArtworkRepository {
    db: DatabaseConnection,
}

impl SeaOrmArtworkRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Run an artwork query with the artist joined in
    async fn load(&self, query: Select<ArtworkEntity>) -> Result<Vec<Artwork>, DomainError> {
        let rows = query
            .find_also_related(artist::Entity)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(model, artist)| to_artwork(model, artist))
            .collect())
    }

    async fn check_references(&self, input: &ArtworkInput) -> Result<(), DomainError> {
        if artist::Entity::find_by_id(input.artist_id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(DomainError::validation(format!(
                "artist {} does not exist",
                input.artist_id
            )));
        }

        if let Some(collection_id) = input.collection_id
            && collection::Entity::find_by_id(collection_id)
                .one(&self.db)
                .await?
                .is_none()
        {
            return Err(DomainError::validation(format!(
                "collection {} does not exist",
                collection_id
            )));
        }

        Ok(())
    }
}

fn to_artwork(model: Model, artist: Option<artist::Model>) -> Artwork {
    Artwork {
        id: model.id,
        title: model.title,
        artist_id: model.artist_id,
        artist_name: artist.map(|a| a.name),
        collection_id: model.collection_id,
        description: model.description,
        story: model.story,
        medium: model.medium,
        year: model.year,
        edition: model.edition,
        price: model.price,
        image_url: model.image_url,
        featured: model.featured,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn apply_input(active: &mut ActiveModel, input: ArtworkInput) {
    active.title = Set(input.title);
    active.artist_id = Set(input.artist_id);
    active.collection_id = Set(input.collection_id);
    active.description = Set(input.description);
    active.story = Set(input.story);
    active.medium = Set(input.medium);
    active.year = Set(input.year);
    active.edition = Set(input.edition);
    active.price = Set(input.price);
    active.image_url = Set(input.image_url);
    active.featured = Set(input.featured);
}

fn newest_first(query: Select<ArtworkEntity>) -> Select<ArtworkEntity> {
    query
        .order_by_desc(Column::CreatedAt)
        .order_by_desc(Column::Id)
}

#[async_trait]
impl ArtworkRepository for SeaOrmArtworkRepository {
    async fn find_all(&self, filter: ArtworkFilter) -> Result<Vec<Artwork>, DomainError> {
        let mut condition = Condition::all();

        if let Some(artist_id) = filter.artist_id {
            condition = condition.add(Column::ArtistId.eq(artist_id));
        }
        if let Some(collection_id) = filter.collection_id {
            condition = condition.add(Column::CollectionId.eq(collection_id));
        }
        if let Some(featured) = filter.featured {
            condition = condition.add(Column::Featured.eq(featured));
        }
        if let Some(medium) = &filter.medium
            && !medium.is_empty()
        {
            condition = condition.add(Column::Medium.eq(medium.as_str()));
        }

        let mut query = newest_first(ArtworkEntity::find().filter(condition));
        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }

        self.load(query).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Artwork>, DomainError> {
        let mut rows = self
            .load(ArtworkEntity::find().filter(Column::Id.eq(id)))
            .await?;
        Ok(rows.pop())
    }

    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Artwork>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.load(ArtworkEntity::find().filter(Column::Id.is_in(ids.iter().copied())))
            .await
    }

    async fn find_featured(
        &self,
        exclude: &[i32],
        limit: u64,
    ) -> Result<Vec<Artwork>, DomainError> {
        let mut condition = Condition::all().add(Column::Featured.eq(true));
        if !exclude.is_empty() {
            condition = condition.add(Column::Id.is_not_in(exclude.iter().copied()));
        }

        self.load(newest_first(ArtworkEntity::find().filter(condition)).limit(limit))
            .await
    }

    async fn find_similar(
        &self,
        artist_ids: &[i32],
        mediums: &[String],
        exclude: &[i32],
        limit: u64,
    ) -> Result<Vec<Artwork>, DomainError> {
        if artist_ids.is_empty() && mediums.is_empty() {
            return Ok(Vec::new());
        }

        let mut similar = Condition::any();
        if !artist_ids.is_empty() {
            similar = similar.add(Column::ArtistId.is_in(artist_ids.iter().copied()));
        }
        if !mediums.is_empty() {
            similar = similar.add(Column::Medium.is_in(mediums.iter().cloned()));
        }

        let mut condition = Condition::all().add(similar);
        if !exclude.is_empty() {
            condition = condition.add(Column::Id.is_not_in(exclude.iter().copied()));
        }

        self.load(newest_first(ArtworkEntity::find().filter(condition)).limit(limit))
            .await
    }

    async fn find_traits(&self, ids: &[i32]) -> Result<Vec<ArtworkTraits>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<(i32, i32, Option<String>)> = ArtworkEntity::find()
            .select_only()
            .column(Column::Id)
            .column(Column::ArtistId)
            .column(Column::Medium)
            .filter(Column::Id.is_in(ids.iter().copied()))
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, artist_id, medium)| ArtworkTraits {
                id,
                artist_id,
                medium,
            })
            .collect())
    }

    async fn create(&self, input: ArtworkInput) -> Result<Artwork, DomainError> {
        self.check_references(&input).await?;
        let now = chrono::Utc::now().to_rfc3339();

        let mut artwork = ActiveModel {
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        apply_input(&mut artwork, input);

        let inserted = artwork.insert(&self.db).await?;
        self.find_by_id(inserted.id)
            .await?
            .ok_or_else(|| DomainError::Internal("artwork vanished after insert".to_string()))
    }

    async fn update(&self, id: i32, input: ArtworkInput) -> Result<Artwork, DomainError> {
        let existing = ArtworkEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;
        self.check_references(&input).await?;

        let mut artwork: ActiveModel = existing.into();
        apply_input(&mut artwork, input);
        artwork.updated_at = Set(chrono::Utc::now().to_rfc3339());
        artwork.update(&self.db).await?;

        self.find_by_id(id).await?.ok_or(DomainError::NotFound)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = ArtworkEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        Ok(())
    }
}
