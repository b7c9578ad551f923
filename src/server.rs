//! HTTP server wiring
//!
//! # Architecture
//!
//! ```text
//! HTTP Request ──> TraceLayer ──> Compression ──> CatchPanic ──> Router
//!                                                                  │
//!                               ┌──────────────────────────────────┤
//!                               ▼                                  ▼
//!                         live_handler                 pdf_handler / image_handler
//!                               │                                  │
//!                               ▼                                  ▼
//!                       BrowserProvider                         Renderer
//!                               │                                  │
//!                               └──────────> AppError <────────────┘
//!                                       (500 "Internal Error")
//! ```

use std::any::Any;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use thiserror::Error;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::{error, Level};

use crate::browser::{BrowserProvider, Renderer};
use crate::config::RunMode;
use crate::handlers::{image_handler, live_handler, pdf_handler};

/// Body sent with every failed liveness check or render
pub const INTERNAL_ERROR_BODY: &str = "Internal Error";

/// Shared application state.
///
/// Both collaborators are injected so tests can swap them for stubs.
#[derive(Clone)]
pub struct AppState {
    /// Turns HTML into PDF or JPEG bytes
    pub renderer: Arc<dyn Renderer>,
    /// Hands out the shared browser for the liveness check
    pub browsers: Arc<dyn BrowserProvider>,
}

impl AppState {
    /// Create state from the two collaborators
    pub fn new(renderer: Arc<dyn Renderer>, browsers: Arc<dyn BrowserProvider>) -> Self {
        Self { renderer, browsers }
    }
}

/// Any failure raised while handling a request.
///
/// Its [`IntoResponse`] impl is the one place that logs the failure and picks
/// what the client sees: always `500` with a fixed plain-text body.
#[derive(Debug, Error)]
pub enum AppError {
    /// Browser or renderer failure
    #[error(transparent)]
    Service(#[from] crate::Error),

    /// A handler panicked
    #[error("Handler panicked: {0}")]
    Panic(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!(error = %self, details = ?self, "Error when processing request");
        (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response()
    }
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    AppError::Panic(message).into_response()
}

/// Router settings that come from configuration
#[derive(Debug, Clone, Copy)]
pub struct RouterConfig {
    /// Maximum request body size in bytes
    pub body_limit: usize,
    /// Selects the request log format
    pub mode: RunMode,
}

/// Build the service router.
///
/// # Routes
/// - `GET /.live` - liveness probe
/// - `POST /image` - render JPEG
/// - `POST /pdf` - render PDF
/// - `POST /` - render PDF
pub fn build_router(state: AppState, config: RouterConfig) -> Router {
    let app = Router::new()
        .route("/.live", get(live_handler))
        .route("/image", post(image_handler))
        .route("/pdf", post(pdf_handler))
        .route("/", post(pdf_handler))
        .layer(DefaultBodyLimit::max(config.body_limit))
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CompressionLayer::new());

    with_request_logging(app, config.mode)
}

// Failures are already logged by AppError, so the trace layer stays quiet
// about them.
fn with_request_logging(app: Router, mode: RunMode) -> Router {
    match mode {
        RunMode::Production => app.layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(())
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                )
                .on_failure(()),
        ),
        RunMode::Development => app.layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(true),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Micros)
                        .include_headers(true),
                )
                .on_failure(()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_app_error_response() {
        let err = AppError::from(crate::Error::from(crate::error::RenderError::PdfFailed(
            "renderer exploded".to_string(),
        )));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], INTERNAL_ERROR_BODY.as_bytes());
    }

    #[tokio::test]
    async fn test_app_error_hides_details() {
        let err = AppError::from(crate::Error::cdp("ws://127.0.0.1:9222 refused"));
        let body = to_bytes(err.into_response().into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(!String::from_utf8_lossy(&body).contains("9222"));
    }

    #[tokio::test]
    async fn test_panic_handler_uses_same_response() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], INTERNAL_ERROR_BODY.as_bytes());
    }
}
