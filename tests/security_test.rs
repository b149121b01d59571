mod common;

use axum::http::{Method, StatusCode};
use common::spawn_app;
use gallery::auth::{create_jwt, decode_jwt, hash_password, verify_password};
use gallery::infrastructure::session::{grant_role, has_role};
use gallery::models::Role;
use sea_orm::{ConnectionTrait, Statement};
use serde_json::json;

#[test]
fn test_password_hashing() {
    let hash = hash_password("correct-horse").unwrap();
    assert_ne!(hash, "correct-horse");
    assert!(verify_password("correct-horse", &hash).unwrap());
    assert!(!verify_password("wrong-horse", &hash).unwrap());
}

#[test]
fn test_tampered_token_is_rejected() {
    let token = create_jwt(42, "visitor@example.com").unwrap();
    let claims = decode_jwt(&token).unwrap();
    assert_eq!(claims.user_id(), Some(42));

    let mut tampered = token.clone();
    tampered.push('x');
    assert!(decode_jwt(&tampered).is_err());
}

#[tokio::test]
async fn test_admin_routes_are_gated() {
    let app = spawn_app().await;
    let body = json!({ "name": "Gatekeeper" });

    let (status, rejection) = app.post("/api/admin/artists", None, body.clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(rejection["redirect"], "/auth");

    let (visitor, _) = app.sign_up("visitor@example.com").await;
    let (status, rejection) = app
        .post("/api/admin/artists", Some(&visitor), body.clone())
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(rejection["redirect"], "/auth");

    let admin = app.admin_token().await;
    let (status, _) = app.post("/api/admin/artists", Some(&admin), body).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_signup_grants_user_role_only() {
    let app = spawn_app().await;

    let (status, grant) = app
        .post(
            "/api/auth/signup",
            None,
            json!({ "email": "New@Example.com", "password": "long-enough" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(grant["is_admin"], false);
    assert_eq!(grant["user"]["email"], "new@example.com");

    let id = grant["user"]["id"].as_i64().unwrap() as i32;
    assert!(has_role(app.state.db(), id, Role::User).await.unwrap());
    assert!(!has_role(app.state.db(), id, Role::Admin).await.unwrap());

    let (status, _) = app
        .post(
            "/api/auth/signup",
            None,
            json!({ "email": "new@example.com", "password": "long-enough" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .post(
            "/api/auth/signup",
            None,
            json!({ "email": "short@example.com", "password": "short" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let app = spawn_app().await;
    app.sign_up("visitor@example.com").await;

    let (status, body) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "visitor@example.com", "password": "not-the-password" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");

    // Unknown email gets the same answer
    let (status, body) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "nobody@example.com", "password": "correct-horse" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");

    let (status, grant) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "visitor@example.com", "password": "correct-horse" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(grant["token"].is_string());
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let app = spawn_app().await;
    let (token, _) = app.sign_up("visitor@example.com").await;

    let (status, me) = app.get("/api/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["user"]["email"], "visitor@example.com");
    assert_eq!(me["is_admin"], false);

    let (status, _) = app
        .request(Method::POST, "/api/auth/logout", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.get("/api/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app.get("/api/me/favorites", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sign_out_clears_user_cache() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let artist_id = app.create_artist(&admin, "Mira Sol").await;
    let artwork_id = app
        .create_artwork(&admin, json!({ "title": "Dawn Field", "artist_id": artist_id }))
        .await;
    let (token, _) = app.sign_up("visitor@example.com").await;

    let uri = format!("/api/me/favorites/{}", artwork_id);
    app.request(Method::PUT, &uri, Some(&token), None).await;
    let (_, favorites) = app.get("/api/me/favorites", Some(&token)).await;
    assert_eq!(favorites.as_array().unwrap().len(), 1);
    let before = app.state.cache.len();
    assert!(before > 0);

    app.request(Method::POST, "/api/auth/logout", Some(&token), None)
        .await;
    assert!(app.state.cache.len() < before);
}

#[tokio::test]
async fn test_user_collections_are_private() {
    let app = spawn_app().await;
    let (owner, _) = app.sign_up("owner@example.com").await;
    let (other, _) = app.sign_up("other@example.com").await;

    let (status, created) = app
        .post("/api/me/collections", Some(&owner), json!({ "name": "Blue things" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/api/me/collections/{}", created["id"]);

    let (status, _) = app.get(&uri, Some(&owner)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get(&uri, Some(&other)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.request(Method::DELETE, &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listed) = app.get("/api/me/collections", Some(&other)).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_anonymous_view_is_accepted_but_not_recorded() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let artist_id = app.create_artist(&admin, "Mira Sol").await;
    let artwork_id = app
        .create_artwork(&admin, json!({ "title": "Dawn Field", "artist_id": artist_id }))
        .await;

    let (status, _) = app
        .request(
            Method::POST,
            &format!("/api/artworks/{}/view", artwork_id),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (status, _) = app.get("/api/me/recommendations", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_failed_role_lookup_is_not_admin() {
    let app = spawn_app().await;
    let (token, id) = app.sign_up("curator@example.com").await;
    grant_role(app.state.db(), id, Role::Admin).await.unwrap();

    let session = app.state.sessions.restore(app.state.db(), &token).await;
    assert!(session.is_admin);

    let db = app.state.db();
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "DROP TABLE user_roles".to_string(),
    ))
    .await
    .unwrap();

    let session = app.state.sessions.restore(db, &token).await;
    assert_eq!(session.user_id(), Some(id));
    assert!(!session.is_admin);

    let (status, _) = app
        .post("/api/admin/artists", Some(&token), json!({ "name": "Nope" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
