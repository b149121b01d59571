//! Recommendation Service - "you might also like" for a signed-in user
//!
//! Ranking works off the artworks a user has favorited or viewed:
//! 1. No interactions: the newest featured artworks.
//! 2. Otherwise: artworks by the same artists or in the same mediums,
//!    excluding anything already interacted with, newest first.
//! 3. Interactions whose artworks are all gone: featured artworks, still
//!    excluding the interacted set.

use super::keys::RECOMMENDATIONS;
use crate::domain::{Artwork, ArtworkRepository, DomainError, InteractionRepository};
use crate::infrastructure::AppState;
use crate::infrastructure::cache::QueryKey;

pub const RECOMMENDATION_LIMIT: u64 = 6;

/// Favorited and viewed artwork IDs, deduplicated, favorites first.
async fn interacted_ids(
    interactions: &dyn InteractionRepository,
    user_id: i32,
) -> Result<Vec<i32>, DomainError> {
    let mut ids = interactions.favorite_artwork_ids(user_id).await?;
    for id in interactions.viewed_artwork_ids(user_id).await? {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

pub async fn recommend(
    artworks: &dyn ArtworkRepository,
    interactions: &dyn InteractionRepository,
    user_id: i32,
) -> Result<Vec<Artwork>, DomainError> {
    let interacted = interacted_ids(interactions, user_id).await?;
    if interacted.is_empty() {
        tracing::debug!(user_id, "no interactions, recommending featured artworks");
        return artworks.find_featured(&[], RECOMMENDATION_LIMIT).await;
    }

    let mut artist_ids: Vec<i32> = Vec::new();
    let mut mediums: Vec<String> = Vec::new();
    for traits in artworks.find_traits(&interacted).await? {
        if !artist_ids.contains(&traits.artist_id) {
            artist_ids.push(traits.artist_id);
        }
        if let Some(medium) = traits.medium.map(|m| m.trim().to_string())
            && !medium.is_empty()
            && !mediums.contains(&medium)
        {
            mediums.push(medium);
        }
    }

    if artist_ids.is_empty() && mediums.is_empty() {
        tracing::debug!(user_id, "interacted artworks are gone, falling back to featured");
        return artworks
            .find_featured(&interacted, RECOMMENDATION_LIMIT)
            .await;
    }

    artworks
        .find_similar(&artist_ids, &mediums, &interacted, RECOMMENDATION_LIMIT)
        .await
}

/// Cached recommendations for `user_id`
pub async fn get_recommendations(state: &AppState, user_id: i32) -> Result<Vec<Artwork>, DomainError> {
    let artworks = state.artwork_repo.clone();
    let interactions = state.interaction_repo.clone();
    state
        .cache
        .fetch(
            QueryKey::new(RECOMMENDATIONS).for_user(user_id),
            move || async move { recommend(artworks.as_ref(), interactions.as_ref(), user_id).await },
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ArtworkFilter, ArtworkInput, ArtworkTraits};
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct FakeArtworks(Vec<Artwork>);

    fn artwork(id: i32, artist_id: i32, medium: Option<&str>, featured: bool) -> Artwork {
        Artwork {
            id,
            title: format!("Artwork {}", id),
            artist_id,
            artist_name: None,
            collection_id: None,
            description: None,
            story: None,
            medium: medium.map(str::to_string),
            year: None,
            edition: None,
            price: None,
            image_url: None,
            featured,
            // higher id = newer
            created_at: format!("2024-01-01T00:00:{:02}Z", id),
            updated_at: String::new(),
        }
    }

    impl FakeArtworks {
        fn newest(&self, keep: impl Fn(&Artwork) -> bool, exclude: &[i32], limit: u64) -> Vec<Artwork> {
            let mut rows: Vec<Artwork> = self
                .0
                .iter()
                .filter(|a| keep(a) && !exclude.contains(&a.id))
                .cloned()
                .collect();
            rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            rows.truncate(limit as usize);
            rows
        }
    }

    #[async_trait]
    impl ArtworkRepository for FakeArtworks {
        async fn find_all(&self, _filter: ArtworkFilter) -> Result<Vec<Artwork>, DomainError> {
            Ok(self.newest(|_| true, &[], u64::MAX))
        }

        async fn find_by_id(&self, id: i32) -> Result<Option<Artwork>, DomainError> {
            Ok(self.0.iter().find(|a| a.id == id).cloned())
        }

        async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Artwork>, DomainError> {
            Ok(self.0.iter().filter(|a| ids.contains(&a.id)).cloned().collect())
        }

        async fn find_featured(&self, exclude: &[i32], limit: u64) -> Result<Vec<Artwork>, DomainError> {
            Ok(self.newest(|a| a.featured, exclude, limit))
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
            Ok(self.newest(
                |a| {
                    artist_ids.contains(&a.artist_id)
                        || a.medium.as_ref().is_some_and(|m| mediums.contains(m))
                },
                exclude,
                limit,
            ))
        }

        async fn find_traits(&self, ids: &[i32]) -> Result<Vec<ArtworkTraits>, DomainError> {
            Ok(self
                .0
                .iter()
                .filter(|a| ids.contains(&a.id))
                .map(|a| ArtworkTraits {
                    id: a.id,
                    artist_id: a.artist_id,
                    medium: a.medium.clone(),
                })
                .collect())
        }

        async fn create(&self, _input: ArtworkInput) -> Result<Artwork, DomainError> {
            Err(DomainError::Internal("read-only fake".into()))
        }

        async fn update(&self, _id: i32, _input: ArtworkInput) -> Result<Artwork, DomainError> {
            Err(DomainError::Internal("read-only fake".into()))
        }

        async fn delete(&self, _id: i32) -> Result<(), DomainError> {
            Err(DomainError::Internal("read-only fake".into()))
        }
    }

    #[derive(Default)]
    struct FakeInteractions {
        favorites: HashMap<i32, Vec<i32>>,
        views: HashMap<i32, Vec<i32>>,
    }

    #[async_trait]
    impl InteractionRepository for FakeInteractions {
        async fn favorite_artwork_ids(&self, user_id: i32) -> Result<Vec<i32>, DomainError> {
            Ok(self.favorites.get(&user_id).cloned().unwrap_or_default())
        }

        async fn viewed_artwork_ids(&self, user_id: i32) -> Result<Vec<i32>, DomainError> {
            Ok(self.views.get(&user_id).cloned().unwrap_or_default())
        }

        async fn is_favorite(&self, user_id: i32, artwork_id: i32) -> Result<bool, DomainError> {
            Ok(self
                .favorites
                .get(&user_id)
                .is_some_and(|ids| ids.contains(&artwork_id)))
        }

        async fn set_favorite(&self, _: i32, _: i32, _: bool) -> Result<(), DomainError> {
            Err(DomainError::Internal("read-only fake".into()))
        }

        async fn record_view(&self, _: i32, _: i32) -> Result<(), DomainError> {
            Err(DomainError::Internal("read-only fake".into()))
        }
    }

    fn ids(artworks: &[Artwork]) -> Vec<i32> {
        artworks.iter().map(|a| a.id).collect()
    }

    #[tokio::test]
    async fn cold_start_returns_newest_featured() {
        let catalog = FakeArtworks(
            (1..=10)
                .map(|id| artwork(id, 1, Some("Oil"), id != 5))
                .collect(),
        );
        let result = recommend(&catalog, &FakeInteractions::default(), 1)
            .await
            .unwrap();

        assert_eq!(ids(&result), vec![10, 9, 8, 7, 6, 4]);
        assert!(result.iter().all(|a| a.featured));
    }

    #[tokio::test]
    async fn similar_artworks_exclude_interacted_ones() {
        let catalog = FakeArtworks(vec![
            artwork(1, 1, Some("Oil"), false),
            artwork(2, 1, None, false),
            artwork(3, 2, Some("Oil"), false),
            artwork(4, 3, Some("Bronze"), true),
            artwork(5, 1, Some("Ink"), false),
        ]);
        let interactions = FakeInteractions {
            favorites: HashMap::from([(7, vec![1])]),
            views: HashMap::from([(7, vec![5, 1])]),
        };

        let result = recommend(&catalog, &interactions, 7).await.unwrap();

        assert_eq!(ids(&result), vec![3, 2]);
    }

    #[tokio::test]
    async fn null_mediums_still_match_by_artist() {
        let catalog = FakeArtworks(vec![
            artwork(1, 4, None, false),
            artwork(2, 4, None, false),
            artwork(3, 5, None, true),
        ]);
        let interactions = FakeInteractions {
            views: HashMap::from([(1, vec![1])]),
            ..Default::default()
        };

        let result = recommend(&catalog, &interactions, 1).await.unwrap();

        assert_eq!(ids(&result), vec![2]);
    }

    #[tokio::test]
    async fn deleted_interactions_fall_back_to_featured() {
        let catalog = FakeArtworks(vec![
            artwork(1, 1, Some("Oil"), true),
            artwork(2, 2, Some("Ink"), true),
        ]);
        // artworks 40 and 41 no longer exist
        let interactions = FakeInteractions {
            favorites: HashMap::from([(1, vec![40, 41])]),
            ..Default::default()
        };

        let result = recommend(&catalog, &interactions, 1).await.unwrap();

        assert_eq!(ids(&result), vec![2, 1]);
    }

    #[tokio::test]
    async fn filter_without_matches_is_empty() {
        let catalog = FakeArtworks(vec![
            artwork(1, 1, Some("Oil"), false),
            artwork(2, 2, Some("Ink"), true),
        ]);
        let interactions = FakeInteractions {
            favorites: HashMap::from([(1, vec![1])]),
            ..Default::default()
        };

        let result = recommend(&catalog, &interactions, 1).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn results_are_capped() {
        let mut rows = vec![artwork(1, 1, Some("Oil"), false)];
        rows.extend((2..=20).map(|id| artwork(id, 1, Some("Oil"), false)));
        let catalog = FakeArtworks(rows);
        let interactions = FakeInteractions {
            favorites: HashMap::from([(1, vec![1])]),
            ..Default::default()
        };

        let result = recommend(&catalog, &interactions, 1).await.unwrap();

        assert_eq!(result.len(), RECOMMENDATION_LIMIT as usize);
        assert!(!ids(&result).contains(&1));
    }
}
