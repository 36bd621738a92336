//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::services::plaid_client::PlaidError;

/// Application-wide error type.
///
/// Each variant maps to a specific HTTP status code and error message.
///
/// # Error Categories
///
/// - **Authorization Errors**: Missing or unrecognized API key
/// - **Validation Errors**: Missing or malformed request fields
/// - **Resource Errors**: No linked credential for the user
/// - **Upstream Errors**: The financial data API failed or timed out
/// - **Storage Errors**: Local database failures
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// API key is missing, empty, or does not match any stored key.
    ///
    /// Returns HTTP 403 Forbidden.
    #[error("Unauthorized access")]
    Unauthorized,

    /// A required field is missing or malformed.
    ///
    /// Returns HTTP 400 Bad Request with the validation message.
    #[error("{0}")]
    BadRequest(String),

    /// No stored credential matches the request.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("{0}")]
    NotFound(String),

    /// The financial data API returned an error, timed out, or was unreachable.
    ///
    /// Returns HTTP 500 with a generic message. Details are logged only.
    #[error("Upstream API error: {0}")]
    Upstream(#[from] PlaidError),

    /// Local persistence failed.
    ///
    /// Returns HTTP 500 with a generic message. Logged separately from
    /// upstream failures so orphaned remote credentials can be reconciled.
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl AppError {
    /// Shorthand for a `BadRequest` with a static message.
    pub fn bad_request(message: &str) -> Self {
        AppError::BadRequest(message.to_string())
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `Unauthorized` → 403 Forbidden
/// - `BadRequest` → 400 Bad Request
/// - `NotFound` → 404 Not Found
/// - `Upstream` → 500 Internal Server Error (hides details from client)
/// - `Storage` → 500 Internal Server Error (hides details from client)
///
/// Server-side failures are logged at error level where they occur, with the
/// operation and user attached. Only a debug line is emitted here.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Unauthorized => (StatusCode::FORBIDDEN, "unauthorized", self.to_string()),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::Upstream(ref e) => {
                tracing::debug!(error = %e, "Responding to upstream failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "upstream_error",
                    "Failed to reach the financial data provider".to_string(),
                )
            }
            AppError::Storage(ref e) => {
                tracing::debug!(error = %e, "Responding to storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
