//! Mapping of tracker errors onto HTTP responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use family_run::TrackerError;
use serde_json::json;
use tracing::{error, warn};

/// Error returned by every handler.
#[derive(Debug)]
pub enum ApiError {
    /// A store operation failed.
    Tracker(TrackerError),
    /// The request body was not usable JSON for the endpoint.
    BadBody(String),
}

impl ApiError {
    /// Returns the HTTP status code for this error.
    ///
    /// - Validation errors and bad bodies: 400 Bad Request
    /// - Unknown feedback id: 404 Not Found
    /// - Storage failures: 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadBody(_) => StatusCode::BAD_REQUEST,
            Self::Tracker(e) if e.is_validation() => StatusCode::BAD_REQUEST,
            Self::Tracker(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            Self::Tracker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TrackerError> for ApiError {
    fn from(err: TrackerError) -> Self {
        Self::Tracker(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Storage details stay in the log, not in the response.
        let message = match &self {
            Self::Tracker(e) if status == StatusCode::INTERNAL_SERVER_ERROR => {
                error!(error = %e, "request failed on storage");
                "Internal storage error".to_string()
            },
            Self::Tracker(e) => e.to_string(),
            Self::BadBody(detail) => {
                warn!(detail, "rejected request body");
                "Invalid request body".to_string()
            },
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
