pub mod artist;
pub mod artist_follow;
pub mod artwork;
pub mod artwork_view;
pub mod collection;
pub mod collector;
pub mod exhibition;
pub mod exhibition_artwork;
pub mod favorite;
pub mod interview;
pub mod journal_entry;
pub mod newsletter_subscriber;
pub mod status;
pub mod user;
pub mod user_collection;
pub mod user_collection_artwork;
pub mod user_role;

pub use status::{ExhibitionStatus, JournalCategory, PublishStatus, Role};
