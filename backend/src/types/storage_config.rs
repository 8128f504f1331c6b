//! Object storage credentials and bucket location

use std::{env, fmt};

use thiserror::Error;

/// Host suffix of the R2 S3-compatible API; the account id is prepended to it
pub const STORAGE_DOMAIN: &str = "r2.cloudflarestorage.com";

/// Errors raised while loading configuration
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is missing or blank
    #[error("{0} environment variable is not set")]
    MissingVar(&'static str),
}

/// Process-wide storage settings, read once at startup and never mutated
#[derive(Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Access key id used to sign upload URLs
    pub access_key_id: String,
    /// Secret access key used to sign upload URLs
    pub secret_access_key: String,
    /// Account id, the leading label of the storage endpoint host
    pub account_id: String,
    /// Bucket that receives uploads
    pub bucket_name: String,
}

impl StorageConfig {
    /// Loads the configuration from `R2_ACCESS_KEY_ID`, `R2_SECRET_ACCESS_KEY`,
    /// `R2_ACCOUNT_ID` and `R2_BUCKET_NAME`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingVar` naming the first variable that is unset or blank
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            access_key_id: required_var("R2_ACCESS_KEY_ID")?,
            secret_access_key: required_var("R2_SECRET_ACCESS_KEY")?,
            account_id: required_var("R2_ACCOUNT_ID")?,
            bucket_name: required_var("R2_BUCKET_NAME")?,
        })
    }

    /// Base URL of the S3-compatible endpoint for this account
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        format!("https://{}.{STORAGE_DOMAIN}", self.account_id)
    }
}

// Never print the secret, not even in debug logs
impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("account_id", &self.account_id)
            .field("bucket_name", &self.bucket_name)
            .finish()
    }
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::MissingVar(name))
}
