//! Custom error types for the attendance service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::DatabaseError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failures of the attendance domain operations
#[derive(Error, Debug)]
pub enum AttendanceError {
    /// A required field was missing or blank
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Scan from a badge that is not in the user directory
    #[error("RFID {0} is not registered")]
    UnregisteredBadge(String),

    /// Registration of a badge that already exists
    #[error("RFID {0} is already registered")]
    DuplicateBadge(String),

    /// The underlying store call failed
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] DatabaseError),
}

/// Type alias for domain results
pub type AttendanceResult<T> = Result<T, AttendanceError>;

/// Custom error type for the HTTP layer
#[derive(Error, Debug)]
pub enum ApiError {
    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Badge rejected
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Internal server error with the message shown to the client
    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl ApiError {
    /// Map a domain error. `failure` is the client message for store faults;
    /// the cause itself is only logged.
    pub fn from_attendance(err: AttendanceError, failure: &str) -> Self {
        match err {
            AttendanceError::InvalidInput(msg) => ApiError::BadRequest(msg),
            AttendanceError::UnregisteredBadge(_) => {
                ApiError::Forbidden("RFID not registered".to_string())
            }
            AttendanceError::DuplicateBadge(_) => {
                ApiError::BadRequest("RFID already registered".to_string())
            }
            AttendanceError::StoreUnavailable(e) => {
                error!("{}: {}", failure, e);
                ApiError::InternalServerError(failure.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
