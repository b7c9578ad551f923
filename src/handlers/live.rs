//! Liveness probe
//!
//! `GET /.live` answers `OK` only when the shared browser can be acquired and
//! is still connected. Acquiring it launches the browser on first use.

use axum::extract::State;
use tracing::{debug, instrument};

use crate::error::{BrowserError, Error};
use crate::server::{AppError, AppState};

/// `GET /.live`
#[instrument(skip_all)]
pub async fn live_handler(State(state): State<AppState>) -> Result<&'static str, AppError> {
    debug!("Liveness check requested");

    check_browser(&state).await.map_err(|e| {
        metrics::counter!("liveness_failures_total").increment(1);
        AppError::from(e)
    })?;

    Ok("OK")
}

async fn check_browser(state: &AppState) -> Result<(), Error> {
    let browser = state.browsers.acquire().await?;
    if !browser.is_connected() {
        return Err(BrowserError::Disconnected.into());
    }
    Ok(())
}
