use std::{sync::Arc, time::Duration};

use axum::{error_handling::HandleErrorLayer, BoxError, Extension, Router};
use tokio::net::TcpListener;
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tower_http::trace::TraceLayer;

use crate::{
    routes,
    storage::UploadUrlIssuer,
    types::{AppError, Environment},
};

/// Upper bound on handling one request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Builds the application router with its shared dependencies attached
#[must_use]
pub fn router(issuer: Arc<UploadUrlIssuer>) -> Router {
    router_with_timeout(issuer, REQUEST_TIMEOUT)
}

/// Same as [`router`] with a custom request timeout
///
/// A request exceeding `timeout` gets the generic 500 error body.
#[must_use]
pub fn router_with_timeout(issuer: Arc<UploadUrlIssuer>, timeout: Duration) -> Router {
    routes::handler().layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(HandleErrorLayer::new(handle_middleware_error))
            .layer(TimeoutLayer::new(timeout))
            .layer(Extension(issuer)),
    )
}

async fn handle_middleware_error(err: BoxError) -> AppError {
    if err.is::<tower::timeout::error::Elapsed>() {
        tracing::error!("Request timed out");
    } else {
        tracing::error!("Unhandled middleware error: {err}");
    }
    AppError::internal()
}

/// Starts the server with the given environment and dependencies
///
/// # Errors
///
/// Returns an error if the port is invalid or the server fails to bind
pub async fn start(environment: Environment, issuer: Arc<UploadUrlIssuer>) -> anyhow::Result<()> {
    let router = router(issuer);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], Environment::port()?));

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🔄 Upload URL issuer started in {environment:?} on http://{addr}");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)
}

/// Resolves on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
