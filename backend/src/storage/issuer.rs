use std::{sync::Arc, time::Duration};

use tracing::{debug, instrument};

use super::{ObjectUrl, PresignedUrl, RequestSigner, SigningRequest, StorageResult};
use crate::types::StorageConfig;

/// Lifetime of an issued upload URL
pub const UPLOAD_URL_EXPIRY: Duration = Duration::from_secs(60);

/// Content type every upload must declare
pub const UPLOAD_CONTENT_TYPE: &str = "video/mp4";

/// Issues presigned PUT URLs for single-file uploads into the configured bucket
pub struct UploadUrlIssuer {
    config: StorageConfig,
    signer: Arc<dyn RequestSigner>,
}

impl UploadUrlIssuer {
    /// Creates an issuer for the bucket in `config`, delegating signatures to `signer`
    #[must_use]
    pub fn new(config: StorageConfig, signer: Arc<dyn RequestSigner>) -> Self {
        Self { config, signer }
    }

    /// Issues a URL authorizing one `PUT` of `filename` for the next 60 seconds
    ///
    /// The filename becomes the object key as is: no sanitization, no check
    /// against existing objects.
    ///
    /// # Errors
    ///
    /// Returns the signer's `StorageError` unchanged; a single attempt is made
    #[instrument(skip(self))]
    pub async fn issue_upload_url(&self, filename: &str) -> StorageResult<PresignedUrl> {
        let request = SigningRequest {
            object: ObjectUrl::new(&self.config, filename),
            method: http::Method::PUT,
            content_type: UPLOAD_CONTENT_TYPE,
            expires_in: UPLOAD_URL_EXPIRY,
        };

        debug!("Signing upload URL for {}", request.object);

        self.signer.presign(&request).await
    }
}
