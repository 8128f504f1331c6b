use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response, Router};
use tower::ServiceExt;
use upload_url_issuer::{
    server,
    storage::{
        PresignedUrl, RequestSigner, SigV4RequestSigner, SigningRequest, StorageError,
        StorageResult, UploadUrlIssuer,
    },
    types::StorageConfig,
};

pub const TEST_ACCOUNT_ID: &str = "0123456789abcdef0123456789abcdef";
pub const TEST_BUCKET: &str = "vibeship-videos";
pub const TEST_ACCESS_KEY_ID: &str = "AKIDTESTUPLOADS";
pub const TEST_SECRET_ACCESS_KEY: &str = "test-secret-access-key-never-returned";

/// Setup logging for tests
pub fn setup_test_env() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init()
        .ok();
}

pub fn test_storage_config() -> StorageConfig {
    StorageConfig {
        access_key_id: TEST_ACCESS_KEY_ID.to_string(),
        secret_access_key: TEST_SECRET_ACCESS_KEY.to_string(),
        account_id: TEST_ACCOUNT_ID.to_string(),
        bucket_name: TEST_BUCKET.to_string(),
    }
}

/// Signer that fails like a storage backend rejecting the credentials
pub struct RejectingSigner;

#[async_trait]
impl RequestSigner for RejectingSigner {
    async fn presign(&self, _request: &SigningRequest) -> StorageResult<PresignedUrl> {
        Err(StorageError::Presign(format!(
            "InvalidAccessKeyId: {TEST_ACCESS_KEY_ID}"
        )))
    }
}

/// Signer that takes longer than any sensible request timeout
pub struct StalledSigner;

#[async_trait]
impl RequestSigner for StalledSigner {
    async fn presign(&self, _request: &SigningRequest) -> StorageResult<PresignedUrl> {
        tokio::time::sleep(Duration::from_secs(2)).await;
        Err(StorageError::Presign("signer stalled".to_string()))
    }
}

/// Router wired the same way as the binary, signing with the real SDK signer
pub struct TestSetup {
    pub router: Router,
    pub storage_config: StorageConfig,
}

impl TestSetup {
    pub async fn new() -> Self {
        let storage_config = test_storage_config();
        let signer = Arc::new(SigV4RequestSigner::new(&storage_config));
        Self::with_signer(storage_config, signer)
    }

    pub fn with_signer(storage_config: StorageConfig, signer: Arc<dyn RequestSigner>) -> Self {
        Self::with_timeout(storage_config, signer, server::REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        storage_config: StorageConfig,
        signer: Arc<dyn RequestSigner>,
        timeout: Duration,
    ) -> Self {
        setup_test_env();

        let issuer = Arc::new(UploadUrlIssuer::new(storage_config.clone(), signer));

        Self {
            router: server::router_with_timeout(issuer, timeout),
            storage_config,
        }
    }

    pub async fn send_request(
        &self,
        method: &str,
        route: &str,
        body: Body,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder().uri(route).method(method).body(body)?;
        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    pub async fn send_post_request(
        &self,
        route: &str,
        payload: serde_json::Value,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method("POST")
            .header("Content-Type", "application/json")
            .body(Body::from(payload.to_string()))?;

        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    pub async fn send_get_request(
        &self,
        route: &str,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        self.send_request("GET", route, Body::empty()).await
    }
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    use http_body_util::BodyExt;

    response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes()
        .to_vec()
}

pub async fn parse_response_body(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("Body is not JSON")
}

pub async fn response_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).expect("Body is not UTF-8")
}
