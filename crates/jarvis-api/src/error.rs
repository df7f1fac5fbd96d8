//! API error types and JSON error response formatting.
//!
//! Every error body carries `success: false` next to the error code, so
//! clients can treat success and failure responses uniformly.

use axum::extract::rejection::JsonRejection;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use jarvis_core::error::JarvisError;

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    /// Machine-readable error code (e.g., "bad_request").
    pub error: String,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - missing or invalid fields.
    BadRequest(String),
    /// 404 Not Found.
    NotFound(String),
    /// 500 Internal Server Error.
    Internal(String),
    /// 503 Service Unavailable - optional component not configured.
    ServiceUnavailable(String),
    /// 429 Too Many Requests, with the seconds to wait in `Retry-After`.
    TooManyRequests { retry_after_secs: u64 },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut retry_after = None;
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg)
            }
            ApiError::TooManyRequests { retry_after_secs } => {
                retry_after = Some(retry_after_secs);
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    "too_many_requests",
                    "Too many requests, slow down".to_string(),
                )
            }
        };

        let body = ErrorBody {
            success: false,
            error: error_code.to_string(),
            message,
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

impl From<JarvisError> for ApiError {
    fn from(err: JarvisError) -> Self {
        match &err {
            JarvisError::Config(msg) => ApiError::BadRequest(msg.clone()),
            JarvisError::Storage(msg) => ApiError::Internal(msg.clone()),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
