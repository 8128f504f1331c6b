//! HTTP routes

pub mod upload_url;

use axum::{http::StatusCode, routing::post, Router};

/// Path of the upload URL endpoint
pub const UPLOAD_URL_PATH: &str = "/get-upload-url";

/// Creates the router with all handler routes
///
/// Unknown paths and non-POST methods on the upload path answer 404 rather
/// than 405.
#[must_use]
pub fn handler() -> Router {
    Router::new()
        .route(
            UPLOAD_URL_PATH,
            post(upload_url::get_upload_url).fallback(not_found),
        )
        .fallback(not_found)
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}
