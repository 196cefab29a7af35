use lambda_http::http::StatusCode;
use lambda_http::{Body, Response};

use projects_core::CoreError;

use crate::response;

/// Request-level errors, each rendered as a failure envelope.
///
/// One convention throughout: 400 for malformed input, 404 for an absent
/// single resource, 500 for store failures.
#[derive(Debug)]
pub enum ApiError {
    /// Invalid project id in the path or query string.
    InvalidProjectId(String),
    /// Invalid update key in the request body.
    InvalidFieldPath(String),
    /// Request body failed to parse as the expected JSON shape.
    InvalidBody(String),
    /// Requested record does not exist.
    NotFound(String),
    /// The store call failed.
    Store(String),
}

impl ApiError {
    pub fn into_response(self) -> Response<Body> {
        let (status, message, detail) = match self {
            ApiError::InvalidProjectId(detail) => {
                (StatusCode::BAD_REQUEST, "Invalid project id.", detail)
            }
            ApiError::InvalidFieldPath(detail) => {
                (StatusCode::BAD_REQUEST, "Invalid update key.", detail)
            }
            ApiError::InvalidBody(detail) => {
                (StatusCode::BAD_REQUEST, "Invalid request body.", detail)
            }
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "Project not found.", detail),
            ApiError::Store(detail) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error.",
                detail,
            ),
        };

        response::failure(status, message, detail)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound(msg) => ApiError::NotFound(msg),
            other => {
                tracing::error!("Core error: {other}");
                ApiError::Store(other.to_string())
            }
        }
    }
}
