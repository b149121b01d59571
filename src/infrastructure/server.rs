// Server module - router assembly and the listening loop used by main.rs

use axum::Router;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api;
use crate::api_docs::ApiDoc;
use crate::infrastructure::AppState;

fn cors_layer(origins: &[String]) -> CorsLayer {
    let mut allowed = Vec::new();
    for origin in origins {
        match origin.parse::<axum::http::HeaderValue>() {
            Ok(v) => allowed.push(v),
            Err(e) => tracing::error!("Failed to parse CORS origin '{}': {}", origin, e),
        }
    }

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the full application: API, docs, stored files and the JSON 404.
pub fn build_router(state: AppState) -> Router {
    let config = state.config.clone();

    let mut app = Router::new()
        .merge(SwaggerUi::new("/api/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api::api_router(config.max_upload_bytes));

    // Only a local path prefix can be served from here
    let storage_prefix = config.public_storage_url.trim_end_matches('/');
    if storage_prefix.starts_with('/') && storage_prefix.len() > 1 {
        app = app.nest_service(storage_prefix, ServeDir::new(&config.storage_dir));
    }

    app.fallback(api::error::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_allowed_origins))
        .with_state(state)
}

/// Bind the configured port and serve until the process stops.
pub async fn serve(state: AppState) -> Result<(), String> {
    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.port));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    tracing::info!("Gallery API listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| format!("HTTP server error: {}", e))
}
