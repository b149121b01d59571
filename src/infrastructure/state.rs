//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{ArtistRepository, ArtworkRepository, InteractionRepository, ObjectStore};
use crate::infrastructure::cache::QueryCache;
use crate::infrastructure::config::Config;
use crate::infrastructure::session::SessionStore;
use crate::infrastructure::storage::LocalObjectStore;
use crate::infrastructure::{
    SeaOrmArtistRepository, SeaOrmArtworkRepository, SeaOrmInteractionRepository,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection for services that query tables directly
    db: DatabaseConnection,
    pub config: Arc<Config>,
    pub cache: Arc<QueryCache>,
    pub sessions: Arc<SessionStore>,
    pub storage: Arc<dyn ObjectStore>,
    /// Artist repository
    pub artist_repo: Arc<dyn ArtistRepository>,
    /// Artwork repository
    pub artwork_repo: Arc<dyn ArtworkRepository>,
    /// Favorites and views
    pub interaction_repo: Arc<dyn InteractionRepository>,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        let storage = Arc::new(LocalObjectStore::new(
            config.storage_dir.clone(),
            config.public_storage_url.clone(),
        ));
        Self::with_storage(db, config, storage)
    }

    /// Same as [`AppState::new`] with a caller-supplied object store
    pub fn with_storage(
        db: DatabaseConnection,
        config: Config,
        storage: Arc<dyn ObjectStore>,
    ) -> Self {
        let artist_repo = Arc::new(SeaOrmArtistRepository::new(db.clone()));
        let artwork_repo = Arc::new(SeaOrmArtworkRepository::new(db.clone()));
        let interaction_repo = Arc::new(SeaOrmInteractionRepository::new(db.clone()));

        Self {
            cache: Arc::new(QueryCache::with_capacity(
                config.cache_ttl,
                config.cache_max_entries,
            )),
            sessions: Arc::new(SessionStore::new()),
            config: Arc::new(config),
            storage,
            db,
            artist_repo,
            artwork_repo,
            interaction_repo,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl AsRef<DatabaseConnection> for AppState {
    fn as_ref(&self) -> &DatabaseConnection {
        &self.db
    }
}

// Implement FromRef to allow extracting DatabaseConnection from AppState
impl axum::extract::FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
