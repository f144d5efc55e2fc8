//! HTTP server setup and request handling.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all image handler
//! - Wire up middleware (tracing, timeouts)
//! - Bind server to listener
//! - Translate dispatch outcomes into HTTP responses
//!
//! # Design Decisions
//! - The edge is thin: one handler that hands (host, path) to the
//!   dispatcher and awaits the delivery sink
//! - Load failures map to 404 (the source does not exist as far as the
//!   client is concerned); everything else downstream is a 500

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ProxyConfig;
use crate::dispatch::Dispatcher;
use crate::error::{DispatchError, JobError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

/// HTTP server for the image proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &ProxyConfig, dispatcher: Arc<Dispatcher>) -> Self {
        let state = AppState { dispatcher };
        let router = Self::build_router(config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", get(image_handler))
            .route("/", get(image_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main image handler. Hands the request to the dispatcher and waits
/// for the finished job on its delivery channel.
async fn image_handler(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let path = uri.path();

    tracing::debug!(host = %host, path = %path, "Incoming request");

    let delivery = match state.dispatcher.dispatch(host, path).await {
        Ok(receiver) => receiver,
        Err(DispatchError::ProfileNotFound { .. }) => {
            tracing::warn!(host = %host, path = %path, "No matching profile");
            return (StatusCode::NOT_FOUND, "no matching profile").into_response();
        }
        Err(DispatchError::Stopped) => {
            return (StatusCode::SERVICE_UNAVAILABLE, "dispatcher stopped").into_response();
        }
    };

    let job = match delivery.await {
        Ok(job) => job,
        // The worker that owned this job went away before delivering.
        Err(_) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, "processing aborted").into_response();
        }
    };

    match &job.error {
        None => {
            let body = job.body.clone().unwrap_or_default();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, job.profile.encoder.mime())],
                body,
            )
                .into_response()
        }
        Some(JobError::Load(reason)) => {
            tracing::debug!(path = %job.key, reason = %reason, "Source not found");
            (StatusCode::NOT_FOUND, "source not found").into_response()
        }
        Some(err) => {
            tracing::error!(path = %job.key, error = %err, "Processing failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "processing failed").into_response()
        }
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
