#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use gallery::config::Config;
use gallery::infrastructure::session::grant_role;
use gallery::models::Role;
use gallery::{AppState, build_router, db};
use serde_json::Value;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot`

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
    pub storage: TempDir,
}

// In-memory database and a throwaway storage directory per test
pub async fn spawn_app() -> TestApp {
    let storage = tempfile::tempdir().expect("Failed to create temp dir");
    let config = Config::for_tests(storage.path().to_path_buf());
    let db = db::init_db(&config.database_url)
        .await
        .expect("Failed to init DB");
    let state = AppState::new(db, config);
    TestApp {
        router: build_router(state.clone()),
        state,
        storage,
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    /// Register a visitor and return their bearer token and user id.
    pub async fn sign_up(&self, email: &str) -> (String, i32) {
        let grant = self
            .state
            .sessions
            .sign_up(self.state.db(), email, "correct-horse", None)
            .await
            .expect("Failed to sign up");
        (grant.token, grant.user.id)
    }

    /// Register a user holding the admin role and return their token.
    pub async fn admin_token(&self) -> String {
        let (token, id) = self.sign_up("admin@example.com").await;
        grant_role(self.state.db(), id, Role::Admin)
            .await
            .expect("Failed to grant admin");
        token
    }

    pub async fn create_artist(&self, admin: &str, name: &str) -> i64 {
        let (status, body) = self
            .post("/api/admin/artists", Some(admin), serde_json::json!({ "name": name }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["id"].as_i64().unwrap()
    }

    pub async fn create_artwork(&self, admin: &str, body: Value) -> i64 {
        let (status, body) = self.post("/api/admin/artworks", Some(admin), body).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["id"].as_i64().unwrap()
    }
}
