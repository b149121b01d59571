pub mod admin;
pub mod artists;
pub mod artworks;
pub mod auth;
pub mod collections;
pub mod collectors;
pub mod error;
pub mod exhibitions;
pub mod health;
pub mod interviews;
pub mod journal;
pub mod me;
pub mod newsletter;
pub mod site;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};

use crate::infrastructure::AppState;

/// Room for multipart framing and the JSON payload next to the files
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

pub fn api_router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Auth
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::get_me))
        // Site pages
        .route("/home", get(site::home))
        .route("/about", get(site::about))
        .route("/compare", get(site::compare))
        .route("/newsletter", post(newsletter::subscribe))
        // Catalogue
        .route("/artists", get(artists::list_artists))
        .route("/artists/:id", get(artists::get_artist))
        .route("/artworks", get(artworks::list_artworks))
        .route("/artworks/:id", get(artworks::get_artwork))
        .route("/artworks/:id/view", post(artworks::record_view))
        .route("/collections", get(collections::list_collections))
        .route("/collections/:id", get(collections::get_collection))
        // Editorial
        .route("/journal", get(journal::list_journal))
        .route("/journal/:slug", get(journal::get_journal_entry))
        .route("/interviews", get(interviews::list_interviews))
        .route("/interviews/:slug", get(interviews::get_interview))
        .route("/exhibitions", get(exhibitions::list_exhibitions))
        .route("/exhibitions/:slug", get(exhibitions::get_exhibition))
        .route("/collectors", get(collectors::list_collectors))
        .route("/collectors/:id", get(collectors::get_collector))
        .nest("/me", me_router())
        .nest("/admin", admin_router(max_upload_bytes))
}

fn me_router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(me::dashboard))
        .route("/profile", get(me::get_profile).put(me::update_profile))
        .route("/recommendations", get(me::recommendations))
        .route("/favorites", get(me::list_favorites))
        .route(
            "/favorites/:artwork_id",
            get(me::favorite_status)
                .put(me::add_favorite)
                .delete(me::remove_favorite),
        )
        .route("/favorites/:artwork_id/toggle", post(me::toggle_favorite))
        .route("/follows", get(me::list_follows))
        .route(
            "/follows/:artist_id",
            get(me::follow_status).put(me::follow).delete(me::unfollow),
        )
        .route("/follows/:artist_id/toggle", post(me::toggle_follow))
        .route(
            "/collections",
            get(me::list_collections).post(me::create_collection),
        )
        .route(
            "/collections/:id",
            get(me::get_collection)
                .put(me::update_collection)
                .delete(me::delete_collection),
        )
        .route(
            "/collections/:id/artworks/:artwork_id",
            put(me::add_collection_artwork).delete(me::remove_collection_artwork),
        )
}

fn admin_router(max_upload_bytes: usize) -> Router<AppState> {
    let uploads = Router::new()
        .route("/uploads", post(admin::upload))
        .route("/artists/with-media", post(admin::create_artist_with_media))
        .route("/artworks/with-image", post(admin::create_artwork_with_image))
        // two files per request at most
        .layer(DefaultBodyLimit::max(
            max_upload_bytes.saturating_mul(2) + MULTIPART_OVERHEAD,
        ));

    Router::new()
        .route("/artists", get(admin::list_artists).post(admin::create_artist))
        .route(
            "/artists/:id",
            get(admin::get_artist)
                .put(admin::update_artist)
                .delete(admin::delete_artist),
        )
        .route(
            "/artworks",
            get(admin::list_artworks).post(admin::create_artwork),
        )
        .route(
            "/artworks/:id",
            get(admin::get_artwork)
                .put(admin::update_artwork)
                .delete(admin::delete_artwork),
        )
        .route(
            "/collections",
            get(admin::list_collections).post(admin::create_collection),
        )
        .route(
            "/collections/:id",
            get(admin::get_collection)
                .put(admin::update_collection)
                .delete(admin::delete_collection),
        )
        .route(
            "/journal",
            get(admin::list_journal).post(admin::create_journal_entry),
        )
        .route(
            "/journal/:id",
            get(admin::get_journal_entry)
                .put(admin::update_journal_entry)
                .delete(admin::delete_journal_entry),
        )
        .route(
            "/interviews",
            get(admin::list_interviews).post(admin::create_interview),
        )
        .route(
            "/interviews/:id",
            get(admin::get_interview)
                .put(admin::update_interview)
                .delete(admin::delete_interview),
        )
        .route(
            "/exhibitions",
            get(admin::list_exhibitions).post(admin::create_exhibition),
        )
        .route(
            "/exhibitions/:id",
            get(admin::get_exhibition)
                .put(admin::update_exhibition)
                .delete(admin::delete_exhibition),
        )
        .route(
            "/exhibitions/:id/artworks",
            put(admin::set_exhibition_artworks),
        )
        .route(
            "/collectors",
            get(admin::list_collectors).post(admin::create_collector),
        )
        .route(
            "/collectors/:id",
            get(admin::get_collector)
                .put(admin::update_collector)
                .delete(admin::delete_collector),
        )
        .route("/newsletter", get(admin::list_subscribers))
        .route("/newsletter/:id", axum::routing::delete(admin::delete_subscriber))
        .merge(uploads)
}
