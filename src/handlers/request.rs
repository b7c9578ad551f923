//! Render request body
//!
//! Every body counts against the size limit, but only JSON bodies are
//! interpreted. A request with any other content type, an empty JSON body or
//! a JSON array is treated as `{}` and still renders.

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /`, `POST /pdf` and `POST /image`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    /// HTML to render (default: empty)
    #[serde(default)]
    pub html: String,

    /// Renderer options, passed through untouched.
    ///
    /// `None` when the field is missing or `null`; an empty object stays
    /// `Some`.
    #[serde(default)]
    pub options: Option<Value>,
}

/// Whether the request declares a JSON body (`application/json` or `+json`)
fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

// Rejections come straight from axum's own extractors, so an oversized body
// is a 413 and bad JSON a 400/422, never the 500 of the render path.
#[async_trait]
impl<S> FromRequest<S> for RenderRequest
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = is_json_content_type(req.headers());

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        if !is_json || bytes.is_empty() {
            return Ok(Self::default());
        }

        let Json(value) = Json::<Value>::from_bytes(&bytes).map_err(IntoResponse::into_response)?;

        match value {
            // Fields are only taken by name, never by position.
            Value::Object(_) => {
                let Json(request) =
                    Json::<Self>::from_bytes(&bytes).map_err(IntoResponse::into_response)?;
                Ok(request)
            }
            Value::Array(_) => Ok(Self::default()),
            _ => Err((
                StatusCode::BAD_REQUEST,
                "JSON body must be an object or an array",
            )
                .into_response()),
        }
    }
}
