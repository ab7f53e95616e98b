//! Authorization error types.
//!
//! Maps guard failures to HTTP responses with a JSON body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the role guard.
#[derive(Debug, Error)]
pub enum GuardError {
    /// No authenticated user is attached to the request.
    #[error("Authentication required")]
    Unauthenticated,

    /// The user's roles do not satisfy the requirement.
    #[error("Access denied: user '{username}' requires {requirement}")]
    Forbidden {
        /// Username of the rejected user.
        username: String,
        /// Human-readable requirement.
        requirement: String,
    },
}

impl GuardError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthorized",
            Self::Forbidden { .. } => "forbidden",
        }
    }
}

/// API error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error: String,
    /// Human-readable error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

impl IntoResponse for GuardError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.error_code().to_string(),
            error_description: Some(self.to_string()),
        };
        match self {
            Self::Unauthenticated => {
                (status, [("WWW-Authenticate", "Bearer")], Json(body)).into_response()
            }
            Self::Forbidden { .. } => (status, Json(body)).into_response(),
        }
    }
}

/// Result type for guard checks.
pub type GuardResult<T> = Result<T, GuardError>;
