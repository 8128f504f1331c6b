//! SigV4 query-string signing of object URLs

use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sigv4::{
    http_request::{
        sign, PercentEncodingMode, SignableBody, SignableRequest, SignatureLocation,
        SigningSettings, UriPathNormalizationMode,
    },
    sign::v4,
};
use chrono::{DateTime, Utc};
use tracing::debug;

use super::{PresignedUrl, RequestSigner, SigningRequest, StorageError, StorageResult};
use crate::types::StorageConfig;

/// Service name in the credential scope
pub const SIGNING_SERVICE: &str = "s3";

/// R2 accepts the wildcard region `auto` in the credential scope
pub const SIGNING_REGION: &str = "auto";

/// Longest lifetime S3-compatible stores accept for a presigned URL
const MAX_EXPIRY: Duration = Duration::from_secs(7 * 24 * 60 * 60);

const CREDENTIALS_PROVIDER_NAME: &str = "storage-config";

/// Presigns object URLs with AWS Signature Version 4 in the query string
pub struct SigV4RequestSigner {
    credentials: Credentials,
}

impl SigV4RequestSigner {
    /// Creates a signer holding the credential pair from `config`
    #[must_use]
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            credentials: Credentials::new(
                &config.access_key_id,
                &config.secret_access_key,
                None,
                None,
                CREDENTIALS_PROVIDER_NAME,
            ),
        }
    }

    /// S3 semantics: the path is signed as sent, already encoded once, and never normalized
    fn settings(expires_in: Duration) -> SigningSettings {
        let mut settings = SigningSettings::default();
        settings.signature_location = SignatureLocation::QueryParams;
        settings.expires_in = Some(expires_in);
        settings.percent_encoding_mode = PercentEncodingMode::Single;
        settings.uri_path_normalization_mode = UriPathNormalizationMode::Disabled;
        settings
    }
}

#[async_trait]
impl RequestSigner for SigV4RequestSigner {
    async fn presign(&self, request: &SigningRequest) -> StorageResult<PresignedUrl> {
        if request.method != http::Method::PUT {
            return Err(StorageError::UnsupportedMethod(request.method.clone()));
        }

        if request.expires_in > MAX_EXPIRY {
            return Err(StorageError::ConfigError(format!(
                "Presigned URL expiry of {}s exceeds {}s",
                request.expires_in.as_secs(),
                MAX_EXPIRY.as_secs()
            )));
        }

        let url = request.object.to_string();
        let signed_at = SystemTime::now();
        let identity = self.credentials.clone().into();

        let params = v4::SigningParams::builder()
            .identity(&identity)
            .region(SIGNING_REGION)
            .name(SIGNING_SERVICE)
            .time(signed_at)
            .settings(Self::settings(request.expires_in))
            .build()
            .map_err(|e| StorageError::ConfigError(format!("Invalid signing params: {e}")))?
            .into();

        let signable = SignableRequest::new(
            request.method.as_str(),
            url.as_str(),
            std::iter::once((http::header::CONTENT_TYPE.as_str(), request.content_type)),
            SignableBody::UnsignedPayload,
        )
        .map_err(|e| StorageError::Presign(format!("Unsignable request for {url}: {e}")))?;

        let (instructions, _signature) = sign(signable, &params)
            .map_err(|e| StorageError::Presign(format!("Failed to sign {url}: {e}")))?
            .into_parts();

        let mut signed = http::Request::builder()
            .method(request.method.clone())
            .uri(url.as_str())
            .body(())
            .map_err(|e| StorageError::Presign(format!("Invalid object URL {url}: {e}")))?;
        instructions.apply_to_request_http1x(&mut signed);

        let expires_at = DateTime::<Utc>::from(signed_at) + request.expires_in;

        debug!(
            "Presigned {} for {} expires at {}",
            request.method, request.object, expires_at
        );

        Ok(PresignedUrl {
            url: signed.uri().to_string(),
            expires_at,
        })
    }
}
