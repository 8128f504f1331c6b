//! Issues short-lived presigned URLs for direct uploads to object storage

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// HTTP routes
pub mod routes;

/// HTTP server bootstrap
pub mod server;

/// Upload URL construction and signing
pub mod storage;

/// Configuration, errors and extractors
pub mod types;
