use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};
use upload_url_issuer::{
    server,
    storage::{SigV4RequestSigner, UploadUrlIssuer},
    types::{Environment, StorageConfig},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let environment = Environment::from_env();

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(environment.tracing_level()).into())
        .from_env_lossy();

    // JSON lines for staging/production log collection, plain text for development
    if environment.json_logs() {
        fmt().json().with_env_filter(filter).init();
    } else {
        fmt().with_env_filter(filter).init();
    }

    let storage_config = StorageConfig::from_env()?;
    info!(
        "Loaded storage config for bucket {} on {}",
        storage_config.bucket_name,
        storage_config.endpoint_url()
    );

    let signer = Arc::new(SigV4RequestSigner::new(&storage_config));
    let issuer = Arc::new(UploadUrlIssuer::new(storage_config, signer));

    server::start(environment, issuer).await
}
