//! Services Layer
//!
//! One module per entity. Reads go through the shared query cache; writes
//! invalidate the cache keys whose contents they change, after they succeed.

pub mod artist_service;
pub mod artwork_service;
pub mod collection_service;
pub mod collector_service;
pub mod exhibition_service;
pub mod favorite_service;
pub mod follow_service;
pub mod interview_service;
pub mod journal_service;
pub mod media_service;
pub mod newsletter_service;
pub mod profile_service;
pub mod recommendation_service;
pub mod site_service;
pub mod user_collection_service;

/// Entity names used in cache keys
pub mod keys {
    pub const ARTISTS: &str = "artists";
    pub const ARTWORKS: &str = "artworks";
    pub const COLLECTIONS: &str = "collections";
    pub const COLLECTORS: &str = "collectors";
    pub const EXHIBITIONS: &str = "exhibitions";
    pub const FAVORITES: &str = "favorites";
    pub const FOLLOWS: &str = "follows";
    pub const INTERVIEWS: &str = "interviews";
    pub const JOURNAL: &str = "journal";
    pub const NEWSLETTER: &str = "newsletter";
    pub const PROFILE: &str = "profile";
    pub const RECOMMENDATIONS: &str = "recommendations";
    pub const USER_COLLECTIONS: &str = "user_collections";
}
