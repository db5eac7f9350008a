//! Domain API: appointments, documents, contact form, and router assembly.

pub mod appointments;
pub mod contact;
pub mod documents;
pub mod routes;

pub use routes::{create_router, AppState};

use crate::auth::validate::ValidationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Errors surfaced by the domain route handlers.
#[derive(Debug)]
pub enum ApiError {
    Validation(ValidationError),
    NotFound(String),
    Database(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Database(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(e) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": e.message, "field": e.field })),
            )
                .into_response(),
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::Database(err) => {
                tracing::error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let err = anyhow::anyhow!("boom");
        let api_err: ApiError = err.into();
        assert!(matches!(api_err, ApiError::Database(_)));
    }

    #[test]
    fn test_error_statuses() {
        let not_found = ApiError::NotFound("Appointment not found".to_string()).into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let validation =
            ApiError::Validation(ValidationError::new("name", "name is required")).into_response();
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);

        let db = ApiError::Database(anyhow::anyhow!("boom")).into_response();
        assert_eq!(db.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
