use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::services::newsletter_service;

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
    pub name: Option<String>,
}

pub async fn subscribe(
    State(state): State<AppState>,
    Json(payload): Json<SubscribeRequest>,
) -> Result<(StatusCode, Json<Value>), DomainError> {
    newsletter_service::subscribe(&state, &payload.email, payload.name).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Thanks for subscribing" })),
    ))
}
