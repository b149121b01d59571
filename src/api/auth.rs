use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::infrastructure::session::{AuthGrant, UserSession};

#[derive(Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<AuthGrant>), DomainError> {
    let grant = state
        .sessions
        .sign_up(
            state.db(),
            &payload.email,
            &payload.password,
            payload.display_name,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(grant)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthGrant>, DomainError> {
    let grant = state
        .sessions
        .sign_in(state.db(), &payload.email, &payload.password)
        .await?;
    Ok(Json(grant))
}

pub async fn logout(State(state): State<AppState>, session: UserSession) -> StatusCode {
    state.sessions.sign_out(&state.cache, &session.context);
    StatusCode::NO_CONTENT
}

pub async fn get_me(session: UserSession) -> Json<Value> {
    Json(json!({
        "user": session.user,
        "is_admin": session.context.is_admin,
    }))
}
