//! Presigned upload URLs for the object storage bucket
mod error;
mod issuer;
mod signer;

use std::{fmt, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

pub use error::{StorageError, StorageResult};
pub use issuer::{UploadUrlIssuer, UPLOAD_CONTENT_TYPE, UPLOAD_URL_EXPIRY};
pub use signer::{SigV4RequestSigner, SIGNING_REGION, SIGNING_SERVICE};

use crate::types::StorageConfig;

/// Bytes left unescaped in an object key: SigV4 unreserved characters plus `/`
const KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// Fully-qualified URL of an object in the bucket
///
/// Rendered as `{endpoint}/{bucket}/{key}`. The key is the client supplied
/// filename, kept verbatim and only percent-encoded for the URL path, so
/// `my clip.mp4` is stored as `my clip.mp4` and addressed as `my%20clip.mp4`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectUrl {
    endpoint: String,
    bucket: String,
    key: String,
}

impl ObjectUrl {
    /// Builds the object URL for `key` inside the configured bucket
    #[must_use]
    pub fn new(config: &StorageConfig, key: &str) -> Self {
        Self {
            endpoint: config.endpoint_url(),
            bucket: config.bucket_name.clone(),
            key: key.to_string(),
        }
    }

    /// Scheme and host of the storage endpoint
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Bucket name
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Object key
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.endpoint,
            utf8_percent_encode(&self.bucket, KEY_ENCODE_SET),
            utf8_percent_encode(&self.key, KEY_ENCODE_SET)
        )
    }
}

/// Everything a signer needs to presign one request
#[derive(Debug, Clone)]
pub struct SigningRequest {
    /// Target object
    pub object: ObjectUrl,
    /// HTTP method the URL authorizes
    pub method: http::Method,
    /// `Content-Type` the client must send, covered by the signature
    pub content_type: &'static str,
    /// Lifetime of the URL from the signing instant
    pub expires_in: Duration,
}

/// Presigned URL with expiration information
#[derive(Debug, Clone)]
pub struct PresignedUrl {
    /// The presigned URL
    pub url: String,
    /// UTC instant after which the URL is rejected
    pub expires_at: DateTime<Utc>,
}

/// Produces presigned URLs with a fixed credential pair and signing scope
#[async_trait]
pub trait RequestSigner: Send + Sync {
    /// Signs `request`, embedding the signature in the URL query string
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the request cannot be signed
    async fn presign(&self, request: &SigningRequest) -> StorageResult<PresignedUrl>;
}
