mod environment;
mod error;
mod extractors;
mod storage_config;

pub use environment::Environment;
pub use error::{AppError, ApiErrorResponse, INTERNAL_SERVER_ERROR};
pub use extractors::ValidatedJson;
pub use storage_config::{ConfigError, StorageConfig, STORAGE_DOMAIN};
