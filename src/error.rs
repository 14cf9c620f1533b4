//! Service error types with HTTP status code mapping.
//!
//! [`BookingError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "hotel not found: 9"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status               |
/// |-----------|-----------------|---------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request           |
/// | 2000–2999 | Not Found       | 404 Not Found             |
/// | 3000–3999 | Server          | 500 Internal Server Error |
///
/// [`BookingError::PersistenceError`] only reaches a client from read
/// paths; failed booking writes are absorbed by the service layer.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    /// Hotel with the given id does not exist.
    #[error("hotel not found: {0}")]
    HotelNotFound(i64),

    /// Booking with the given id does not exist.
    #[error("booking not found: {0}")]
    BookingNotFound(i64),

    /// No route matches the request path.
    #[error("no route for path: {0}")]
    RouteNotFound(String),

    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Storage layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),
}

impl BookingError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::RouteNotFound(_) => 2000,
            Self::HotelNotFound(_) => 2001,
            Self::BookingNotFound(_) => 2002,
            Self::PersistenceError(_) => 3001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::RouteNotFound(_) | Self::HotelNotFound(_) | Self::BookingNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::PersistenceError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns `true` for the not-found variants.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::RouteNotFound(_) | Self::HotelNotFound(_) | Self::BookingNotFound(_)
        )
    }
}

impl From<sqlx::Error> for BookingError {
    fn from(err: sqlx::Error) -> Self {
        Self::PersistenceError(err.to_string())
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
