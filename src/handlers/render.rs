//! Render endpoints
//!
//! - `POST /` and `POST /pdf` - HTML to `application/pdf`
//! - `POST /image` - HTML to `image/jpeg`

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tracing::{debug, instrument};

use crate::browser::RenderKind;
use crate::handlers::RenderRequest;
use crate::server::{AppError, AppState};

/// `POST /pdf` (also mounted at `POST /`)
pub async fn pdf_handler(
    State(state): State<AppState>,
    request: RenderRequest,
) -> Result<Response, AppError> {
    render(&state, RenderKind::Pdf, request).await
}

/// `POST /image`
pub async fn image_handler(
    State(state): State<AppState>,
    request: RenderRequest,
) -> Result<Response, AppError> {
    render(&state, RenderKind::Image, request).await
}

#[instrument(skip_all, fields(kind = kind.label()))]
async fn render(
    state: &AppState,
    kind: RenderKind,
    request: RenderRequest,
) -> Result<Response, AppError> {
    metrics::counter!("render_requests_total", "kind" => kind.label()).increment(1);

    let RenderRequest { html, options } = request;
    debug!(html_len = html.len(), has_options = options.is_some(), "Rendering");

    let data = kind
        .render(state.renderer.as_ref(), &html, options.as_ref())
        .await
        .map_err(|e| {
            metrics::counter!("render_failures_total", "kind" => kind.label()).increment(1);
            e
        })?;

    Ok(([(header::CONTENT_TYPE, kind.content_type())], data).into_response())
}
