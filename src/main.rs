//! HTML Render Service
//!
//! Renders posted HTML to PDF or JPEG through headless Chromium.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use html_render_service::browser::{ChromiumProvider, ChromiumRenderer};
use html_render_service::config::{RunMode, ServiceArgs};
use html_render_service::server::{build_router, AppState, RouterConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServiceArgs::parse();

    init_tracing(args.mode, args.verbose);

    tracing::info!(
        "{} {} starting on {}",
        html_render_service::NAME,
        html_render_service::VERSION,
        args.bind_addr()
    );

    let provider = Arc::new(ChromiumProvider::new(args.browser_config()));
    let renderer = Arc::new(ChromiumRenderer::new(Arc::clone(&provider)));
    let state = AppState::new(renderer, provider.clone());

    let app = build_router(
        state,
        RouterConfig {
            body_limit: args.body_limit,
            mode: args.mode,
        },
    );

    let listener = tokio::net::TcpListener::bind(args.bind_addr())
        .await
        .with_context(|| format!("failed to bind {}", args.bind_addr()))?;

    tracing::info!(
        body_limit = args.body_limit,
        production = args.mode.is_production(),
        "Listening on {}",
        args.bind_addr()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Err(e) = provider.shutdown().await {
        tracing::warn!(error = %e, "Failed to close browser");
    }

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(mode: RunMode, verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    if mode.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .compact()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
