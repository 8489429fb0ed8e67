//! Custom error types for the notes service

use axum::{
    Json,
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Custom error type for the notes service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or malformed input
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Registration with an email that is already taken
    #[error("Email already exists")]
    DuplicateEmail,

    /// Unknown email or wrong password; deliberately not told apart
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Missing, invalid or expired bearer token
    #[error("Unauthorized")]
    Unauthorized,

    /// The note does not exist or belongs to someone else
    #[error("Note not found or you are not owner")]
    NotFoundOrNotOwner,

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] common::error::DatabaseError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::DuplicateEmail => StatusCode::CONFLICT,
            ApiError::InvalidCredentials | ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFoundOrNotOwner => StatusCode::NOT_FOUND,
            ApiError::InternalServerError | ApiError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let error_message = match &self {
            ApiError::Validation(msg) => msg.clone(),
            ApiError::Database(e) => {
                error!("Database error: {}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(format!("Invalid path parameter: {}", rejection.body_text()))
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
