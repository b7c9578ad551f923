//! HTML Render Service - HTML to PDF/JPEG over HTTP
//!
//! A thin HTTP facade over headless Chromium. Clients post HTML plus optional
//! renderer options and get a PDF or JPEG back.
//!
//! # Architecture
//!
//! ```text
//! Client ──▶ axum Router ──▶ Renderer ──▶ ChromiumProvider ──▶ Chromium (CDP)
//!                 │
//!                 ├──▶ GET /.live ──▶ BrowserProvider::acquire
//!                 │
//!                 └──▶ AppError ──▶ 500 "Internal Error"
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use html_render_service::browser::{BrowserConfig, ChromiumProvider, ChromiumRenderer};
//! use html_render_service::config::RunMode;
//! use html_render_service::server::{build_router, AppState, RouterConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = Arc::new(ChromiumProvider::new(BrowserConfig::default()));
//!     let renderer = Arc::new(ChromiumRenderer::new(provider.clone()));
//!
//!     let app = build_router(
//!         AppState::new(renderer, provider),
//!         RouterConfig { body_limit: 100 * 1024, mode: RunMode::Development },
//!     );
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod browser;
pub mod config;
pub mod error;
pub mod handlers;
pub mod server;

// Re-exports for convenience
pub use browser::{BrowserHandle, BrowserProvider, RenderKind, Renderer};
pub use error::{Error, Result};
pub use handlers::RenderRequest;
pub use server::{build_router, AppError, AppState, RouterConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
