//! Universal error handling for the API

use std::borrow::Cow;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::storage::StorageError;

/// Message returned for every unexpected failure
pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// API error response body
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    /// Human-readable error message
    pub error: Cow<'static, str>,
}

/// Application error type that wraps the API error response
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    inner: ApiErrorResponse,
}

impl AppError {
    /// Create a new application error
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            status,
            inner: ApiErrorResponse {
                error: message.into(),
            },
        }
    }

    /// 400 carrying the given validation message
    #[must_use]
    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Generic 500; the cause must be logged by the caller, never returned
    #[must_use]
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR)
    }

    /// HTTP status of this error
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Message sent to the client
    #[must_use]
    pub fn message(&self) -> &str {
        &self.inner.error
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self.status.as_u16() {
            400..=499 => tracing::warn!("Client error: {} - {}", self.status, self.inner.error),
            500..=599 => tracing::error!("Server error: {} - {}", self.status, self.inner.error),
            _ => {}
        }

        (self.status, Json(self.inner)).into_response()
    }
}

/// Convert storage errors to application errors
impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        tracing::error!("Failed to issue upload URL: {err}");
        Self::internal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(err: AppError) -> serde_json::Value {
        let response = err.into_response();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_bad_request_body() {
        let err = AppError::bad_request("Filename is required");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(err).await,
            serde_json::json!({ "error": "Filename is required" })
        );
    }

    #[tokio::test]
    async fn test_storage_error_hides_cause() {
        let err = AppError::from(StorageError::Presign(
            "InvalidAccessKeyId: secret detail".to_string(),
        ));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), INTERNAL_SERVER_ERROR);

        let body = body_json(err).await;
        assert_eq!(body, serde_json::json!({ "error": "Internal Server Error" }));
        assert!(!body.to_string().contains("secret detail"));
    }
}
