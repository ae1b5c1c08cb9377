use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use database::DbError;
use serde_json::json;
use service::ServiceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    /// The request could not be decoded (bad id, malformed JSON, bad query string).
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            AppError::Service(ServiceError::Validation(validation)) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": validation.message, "field": validation.field }),
            ),
            AppError::Service(ServiceError::Repository(db_err)) => match db_err {
                DbError::NotFound { .. } => {
                    (StatusCode::NOT_FOUND, json!({ "error": db_err.to_string() }))
                }
                DbError::ConstraintViolation { ref message, .. } => {
                    tracing::warn!(error = %db_err, "Constraint violation.");
                    (StatusCode::CONFLICT, json!({ "error": message }))
                }
                other => {
                    tracing::error!(error = ?other, "Database error.");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        json!({ "error": "An internal server error occurred" }),
                    )
                }
            },
        };

        (status, Json(body)).into_response()
    }
}
