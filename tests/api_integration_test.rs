mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use common::spawn_app;
use gallery::config::Config;
use gallery::models::newsletter_subscriber;
use gallery::services::journal_service;
use gallery::{AppState, db};
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;

#[tokio::test]
async fn test_admin_creates_artist_and_artwork_end_to_end() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let artist_id = app.create_artist(&admin, "Mira Sol").await;
    let artwork_id = app
        .create_artwork(
            &admin,
            json!({ "title": "Dawn Field", "artist_id": artist_id, "medium": "Generative" }),
        )
        .await;

    // Public list embeds the artist name
    let (status, body) = app.get("/api/artworks", None).await;
    assert_eq!(status, StatusCode::OK);
    let listed = body.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], artwork_id);
    assert_eq!(listed[0]["artist_name"], "Mira Sol");

    // Artist page carries the artwork and a follower count
    let (status, body) = app.get(&format!("/api/artists/{}", artist_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Mira Sol");
    assert_eq!(body["artworks"].as_array().unwrap().len(), 1);
    assert_eq!(body["follower_count"], 0);

    // The artist still owns an artwork
    let uri = format!("/api/admin/artists/{}", artist_id);
    let (status, body) = app.request(Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("artwork"));

    let artwork_uri = format!("/api/admin/artworks/{}", artwork_id);
    let (status, _) = app
        .request(Method::DELETE, &artwork_uri, Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.request(Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.get("/api/artists", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_artwork_for_unknown_artist_is_rejected() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let (status, body) = app
        .post(
            "/api/admin/artworks",
            Some(&admin),
            json!({ "title": "Orphan", "artist_id": 404 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("artist"));
}

#[tokio::test]
async fn test_public_collections_hide_drafts() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let (status, published) = app
        .post(
            "/api/admin/collections",
            Some(&admin),
            json!({ "name": "First Light", "status": "published" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, draft) = app
        .post(
            "/api/admin/collections",
            Some(&admin),
            json!({ "name": "Work in Progress" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(draft["status"], "draft");

    let (_, public) = app.get("/api/collections", None).await;
    let names: Vec<&str> = public
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["First Light"]);

    let (_, all) = app.get("/api/admin/collections", Some(&admin)).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (status, _) = app
        .get(&format!("/api/collections/{}", draft["id"]), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = app
        .get(&format!("/api/collections/{}", published["id"]), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["artworks"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_newsletter_duplicate_signup() {
    let app = spawn_app().await;

    let (status, _) = app
        .post("/api/newsletter", None, json!({ "email": "fan@example.com" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    // Same address, different case
    let (status, body) = app
        .post("/api/newsletter", None, json!({ "email": "FAN@example.com " }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "You're already subscribed");

    let rows = newsletter_subscriber::Entity::find()
        .count(app.state.db())
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn test_favorite_toggle_round_trip() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let artist_id = app.create_artist(&admin, "Ada Quill").await;
    let artwork_id = app
        .create_artwork(&admin, json!({ "title": "Ink Weather", "artist_id": artist_id }))
        .await;
    let (token, _) = app.sign_up("visitor@example.com").await;
    let fav_uri = format!("/api/me/favorites/{}", artwork_id);

    let (_, body) = app.get(&fav_uri, Some(&token)).await;
    assert_eq!(body["favorite"], false);

    let toggle_uri = format!("{}/toggle", fav_uri);
    let (status, body) = app.post(&toggle_uri, Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["favorite"], true);
    let (_, body) = app.get(&fav_uri, Some(&token)).await;
    assert_eq!(body["favorite"], true);

    let (_, body) = app.post(&toggle_uri, Some(&token), json!({})).await;
    assert_eq!(body["favorite"], false);
    let (_, body) = app.get("/api/me/favorites", Some(&token)).await;
    assert!(body.as_array().unwrap().is_empty());

    // Setting twice keeps one row
    for _ in 0..2 {
        let (status, _) = app.request(Method::PUT, &fav_uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (_, body) = app.get("/api/me/favorites", Some(&token)).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_follow_updates_follower_count() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let artist_id = app.create_artist(&admin, "Tomás Vega").await;
    let (token, _) = app.sign_up("fan@example.com").await;

    let uri = format!("/api/me/follows/{}", artist_id);
    let (status, body) = app.request(Method::PUT, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["following"], true);

    let (_, body) = app.get(&format!("/api/artists/{}", artist_id), None).await;
    assert_eq!(body["follower_count"], 1);

    let (_, body) = app.get("/api/me/follows", Some(&token)).await;
    assert_eq!(body[0]["name"], "Tomás Vega");

    let (_, body) = app.request(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(body["following"], false);
    let (_, body) = app.get(&format!("/api/artists/{}", artist_id), None).await;
    assert_eq!(body["follower_count"], 0);
}

#[tokio::test]
async fn test_recommendations_follow_interactions() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let mira = app.create_artist(&admin, "Mira Sol").await;
    let kai = app.create_artist(&admin, "Kai").await;

    let seen = app
        .create_artwork(&admin, json!({ "title": "Seen", "artist_id": mira, "medium": "Oil" }))
        .await;
    let sibling = app
        .create_artwork(&admin, json!({ "title": "Sibling", "artist_id": mira }))
        .await;
    let same_medium = app
        .create_artwork(&admin, json!({ "title": "Same Medium", "artist_id": kai, "medium": "Oil" }))
        .await;
    let featured = app
        .create_artwork(
            &admin,
            json!({ "title": "Featured", "artist_id": kai, "medium": "Ink", "featured": true }),
        )
        .await;

    let (token, _) = app.sign_up("visitor@example.com").await;

    // Cold start: featured only
    let (status, body) = app.get("/api/me/recommendations", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![featured]);

    let (status, _) = app
        .post(&format!("/api/artworks/{}/view", seen), Some(&token), json!({}))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = app.get("/api/me/recommendations", Some(&token)).await;
    let mut ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_i64().unwrap())
        .collect();
    ids.sort();
    assert_eq!(ids, vec![sibling, same_medium]);
}

#[tokio::test]
async fn test_exhibition_artworks_keep_display_order() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let artist_id = app.create_artist(&admin, "Mira Sol").await;
    let first = app
        .create_artwork(&admin, json!({ "title": "One", "artist_id": artist_id }))
        .await;
    let second = app
        .create_artwork(&admin, json!({ "title": "Two", "artist_id": artist_id }))
        .await;

    let (status, show) = app
        .post(
            "/api/admin/exhibitions",
            Some(&admin),
            json!({ "title": "Afterimage", "status": "current" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(show["slug"], "afterimage");

    let uri = format!("/api/admin/exhibitions/{}/artworks", show["id"]);
    let (status, _) = app
        .request(
            Method::PUT,
            &uri,
            Some(&admin),
            Some(json!({ "artwork_ids": [second, first] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/api/exhibitions/afterimage", None).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body["artworks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Two", "One"]);

    let (_, current) = app.get("/api/exhibitions?status=current", None).await;
    assert_eq!(current.as_array().unwrap().len(), 1);
    let (_, past) = app.get("/api/exhibitions?status=past", None).await;
    assert!(past.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_journal_slugs_and_missing_entries() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let (status, entry) = app
        .post(
            "/api/admin/journal",
            Some(&admin),
            json!({ "title": "Why Light Still Matters", "status": "published", "category": "Feature" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["slug"], "why-light-still-matters");
    assert!(entry["published_at"].is_string());

    let (status, _) = app.get("/api/journal/why-light-still-matters", None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, essays) = app.get("/api/journal?category=Essay", None).await;
    assert!(essays.as_array().unwrap().is_empty());

    // Same title again collides on the slug
    let (status, _) = app
        .post(
            "/api/admin/journal",
            Some(&admin),
            json!({ "title": "Why light still matters!" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let missing = journal_service::get_journal_entry_by_slug(&app.state, "nonexistent-slug")
        .await
        .unwrap();
    assert!(missing.is_none());
    let (status, _) = app.get("/api/journal/nonexistent-slug", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_compare_keeps_request_order() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let artist_id = app.create_artist(&admin, "Ada Quill").await;
    let mut ids = Vec::new();
    for title in ["A", "B", "C", "D", "E"] {
        ids.push(
            app.create_artwork(&admin, json!({ "title": title, "artist_id": artist_id }))
                .await,
        );
    }

    let uri = format!(
        "/api/compare?ids={},{},999,{},{},{}",
        ids[2], ids[0], ids[1], ids[3], ids[4]
    );
    let (status, body) = app.get(&uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap())
        .collect();
    // Unknown IDs are skipped; at most four are compared
    assert_eq!(titles, vec!["C", "A", "B"]);
}

#[tokio::test]
async fn test_failed_artwork_upload_is_rolled_back() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let boundary = "gallery-test-boundary";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"payload\"\r\n\r\n{payload}\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"orphan.png\"\r\n\
         Content-Type: image/png\r\n\r\nPNGDATA\r\n--{b}--\r\n",
        b = boundary,
        payload = json!({ "title": "Orphan", "artist_id": 999 }),
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/admin/artworks/with-image")
        .header(header::AUTHORIZATION, format!("Bearer {}", admin))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap();

    let (status, _) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let stored = std::fs::read_dir(app.storage.path().join("artworks"))
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(stored, 0);
}

#[tokio::test]
async fn test_artist_rename_reaches_visitor_lists() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let artist_id = app.create_artist(&admin, "Old Name").await;
    let artwork_id = app
        .create_artwork(&admin, json!({ "title": "Dawn Field", "artist_id": artist_id }))
        .await;
    let (token, _) = app.sign_up("visitor@example.com").await;

    app.request(
        Method::PUT,
        &format!("/api/me/follows/{}", artist_id),
        Some(&token),
        None,
    )
    .await;
    app.request(
        Method::PUT,
        &format!("/api/me/favorites/{}", artwork_id),
        Some(&token),
        None,
    )
    .await;

    // Warm the cached lists
    let (_, follows) = app.get("/api/me/follows", Some(&token)).await;
    assert_eq!(follows[0]["name"], "Old Name");
    let (_, favorites) = app.get("/api/me/favorites", Some(&token)).await;
    assert_eq!(favorites[0]["artist_name"], "Old Name");

    let (status, _) = app
        .request(
            Method::PUT,
            &format!("/api/admin/artists/{}", artist_id),
            Some(&admin),
            Some(json!({ "name": "New Name" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, follows) = app.get("/api/me/follows", Some(&token)).await;
    assert_eq!(follows[0]["name"], "New Name");
    let (_, favorites) = app.get("/api/me/favorites", Some(&token)).await;
    assert_eq!(favorites[0]["artist_name"], "New Name");
    let (_, dashboard) = app.get("/api/me/dashboard", Some(&token)).await;
    assert_eq!(dashboard["favorites"][0]["artist_name"], "New Name");
}

#[tokio::test]
async fn test_slug_misses_stay_within_cache_bound() {
    let storage = tempfile::tempdir().unwrap();
    let mut config = Config::for_tests(storage.path().to_path_buf());
    config.cache_max_entries = 50;
    let db = db::init_db(&config.database_url).await.unwrap();
    let state = AppState::new(db, config);

    for i in 0..500 {
        let missing = journal_service::get_journal_entry_by_slug(&state, &format!("nope-{}", i))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    assert!(state.cache.len() <= 50, "cache grew to {}", state.cache.len());
}
