mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use common::spawn_app;
use serde_json::json;

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let app = spawn_app().await;

    let (status, body) = app.get("/api/does-not-exist", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/admin/artists")
        .header(header::AUTHORIZATION, format!("Bearer {}", admin))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let (status, _) = app.send(request).await;
    assert!(status.is_client_error(), "got {}", status);
}

#[tokio::test]
async fn test_missing_artwork_returns_404() {
    let app = spawn_app().await;

    let (status, body) = app.get("/api/artworks/9999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");

    let (status, _) = app.get("/api/artists/9999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.get("/api/exhibitions/no-such-show", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blank_name_fails_validation() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let (status, body) = app
        .post("/api/admin/artists", Some(&admin), json!({ "name": "   " }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("name"));
}

#[tokio::test]
async fn test_negative_price_fails_validation() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let artist_id = app.create_artist(&admin, "Mira Sol").await;

    let (status, _) = app
        .post(
            "/api/admin/artworks",
            Some(&admin),
            json!({ "title": "Costly", "artist_id": artist_id, "price": -1.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_exhibition_dates_must_be_ordered() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let (status, _) = app
        .post(
            "/api/admin/exhibitions",
            Some(&admin),
            json!({ "title": "Backwards", "start_date": "2025-06-01", "end_date": "2025-05-01" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_compare_requires_ids() {
    let app = spawn_app().await;

    let (status, _) = app.get("/api/compare", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app.get("/api/compare?ids=1,abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_newsletter_email() {
    let app = spawn_app().await;

    let (status, _) = app
        .post("/api/newsletter", None, json!({ "email": "not-an-email" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_updating_missing_record_returns_404() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let (status, _) = app
        .request(
            Method::PUT,
            "/api/admin/collectors/404",
            Some(&admin),
            Some(json!({ "name": "Nobody" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .request(Method::DELETE, "/api/admin/journal/404", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
