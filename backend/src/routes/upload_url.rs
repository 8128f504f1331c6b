//! `POST /get-upload-url`

use std::sync::Arc;

use axum::{Extension, Json};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    storage::UploadUrlIssuer,
    types::{AppError, ValidatedJson},
};

/// Request body
#[derive(Debug, Deserialize, Validate)]
pub struct UploadRequest {
    /// Object key for the upload; a missing field and falsy values (`null`,
    /// `false`, `0`) read as empty
    #[serde(default, deserialize_with = "falsy_as_empty")]
    #[validate(length(min = 1, message = "Filename is required"))]
    pub filename: String,
}

/// Success body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlResponse {
    /// URL the client uploads to with `PUT` and `Content-Type: video/mp4`
    pub pre_signed_url: String,
}

/// Strings pass through; other truthy values are rejected rather than stringified
fn falsy_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(filename) => Ok(filename),
        Value::Null | Value::Bool(false) => Ok(String::new()),
        Value::Number(n) if n.as_f64() == Some(0.0) => Ok(String::new()),
        other => Err(D::Error::custom(format!(
            "filename must be a string, got {other}"
        ))),
    }
}

/// Issues a presigned upload URL for the requested filename
///
/// # Errors
///
/// 400 when the filename is missing or empty, 500 when the body cannot be
/// parsed or signing fails
#[instrument(skip(issuer, payload))]
pub async fn get_upload_url(
    Extension(issuer): Extension<Arc<UploadUrlIssuer>>,
    ValidatedJson(payload): ValidatedJson<UploadRequest>,
) -> Result<Json<UploadUrlResponse>, AppError> {
    let presigned_url = issuer.issue_upload_url(&payload.filename).await?;

    info!(
        "Issued upload URL for {} expiring at {}",
        payload.filename,
        presigned_url.expires_at.to_rfc3339()
    );

    Ok(Json(UploadUrlResponse {
        pre_signed_url: presigned_url.url,
    }))
}
