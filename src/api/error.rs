//! HTTP mapping for domain errors
//!
//! Every handler returns `Result<_, DomainError>`; this is the single place
//! where failures become status codes. Bodies are always `{"error": "..."}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::domain::DomainError;

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            DomainError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            DomainError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            DomainError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            DomainError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Invalid email or password".to_string())
            }
            DomainError::Forbidden => (StatusCode::FORBIDDEN, "Admin access required".to_string()),
            DomainError::Database(msg) | DomainError::Storage(msg) | DomainError::Internal(msg) => {
                tracing::error!("Request failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Fallback for unknown routes
pub async fn not_found() -> Response {
    DomainError::NotFound.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        let cases = [
            (DomainError::NotFound, StatusCode::NOT_FOUND),
            (DomainError::validation("x"), StatusCode::BAD_REQUEST),
            (DomainError::Conflict("x".into()), StatusCode::CONFLICT),
            (DomainError::Unauthorized, StatusCode::UNAUTHORIZED),
            (DomainError::Forbidden, StatusCode::FORBIDDEN),
            (DomainError::Database("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::Storage("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }
}
