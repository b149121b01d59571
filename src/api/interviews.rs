use axum::{
    Json,
    extract::{Path, State},
};

use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::services::interview_service::{self, InterviewDto};

pub async fn list_interviews(
    State(state): State<AppState>,
) -> Result<Json<Vec<InterviewDto>>, DomainError> {
    Ok(Json(interview_service::list_interviews(&state).await?))
}

pub async fn get_interview(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<InterviewDto>, DomainError> {
    interview_service::get_interview_by_slug(&state, &slug)
        .await?
        .map(Json)
        .ok_or(DomainError::NotFound)
}
