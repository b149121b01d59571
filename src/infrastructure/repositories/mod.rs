//! Repository implementations using SeaORM

pub mod artist_repository;
pub mod artwork_repository;
pub mod interaction_repository;

pub use artist_repository::SeaOrmArtistRepository;
pub use artwork_repository::SeaOrmArtworkRepository;
pub use interaction_repository::SeaOrmInteractionRepository;
