//! Test doubles for the browser collaborators
//!
//! Shared by the router integration tests. No browser is ever launched.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::Router;
use html_render_service::config::RunMode;
use html_render_service::error::{BrowserError, RenderError};
use html_render_service::{
    build_router, AppState, BrowserHandle, BrowserProvider, RenderKind, Renderer, Result,
    RouterConfig,
};
use serde_json::Value;

pub const PDF_BYTES: &[u8] = b"%PDF-1.7 stub document";
pub const JPEG_BYTES: &[u8] = b"\xFF\xD8\xFF\xE0 stub image";

/// What the stub renderer does when called
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Return these bytes for every input
    Echo(Vec<u8>),
    /// Fail every render
    Fail,
    /// Panic inside the render call
    Panic,
}

/// One recorded renderer invocation
#[derive(Debug, Clone, PartialEq)]
pub struct RenderCall {
    pub kind: RenderKind,
    pub html: String,
    pub options: Option<Value>,
}

/// Renderer that records its calls
pub struct StubRenderer {
    behavior: Behavior,
    calls: Mutex<Vec<RenderCall>>,
}

impl StubRenderer {
    pub fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn respond(&self, kind: RenderKind, html: &str, options: Option<&Value>) -> Result<Vec<u8>> {
        self.calls.lock().unwrap().push(RenderCall {
            kind,
            html: html.to_string(),
            options: options.cloned(),
        });

        match &self.behavior {
            Behavior::Echo(bytes) => Ok(bytes.clone()),
            Behavior::Fail => Err(RenderError::PdfFailed("stub failure".to_string()).into()),
            Behavior::Panic => panic!("stub renderer panicked"),
        }
    }
}

#[async_trait]
impl Renderer for StubRenderer {
    async fn render_pdf(&self, html: &str, options: Option<&Value>) -> Result<Vec<u8>> {
        self.respond(RenderKind::Pdf, html, options)
    }

    async fn render_image(&self, html: &str, options: Option<&Value>) -> Result<Vec<u8>> {
        self.respond(RenderKind::Image, html, options)
    }
}

/// Browser handle with a settable connection flag
pub struct StubBrowser {
    connected: AtomicBool,
}

impl BrowserHandle for StubBrowser {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

/// Provider that either hands out a stub browser or fails to launch
pub struct StubProvider {
    browser: Option<Arc<StubBrowser>>,
}

impl StubProvider {
    pub fn connected() -> Arc<Self> {
        Self::with_state(true)
    }

    pub fn disconnected() -> Arc<Self> {
        Self::with_state(false)
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self { browser: None })
    }

    fn with_state(connected: bool) -> Arc<Self> {
        Arc::new(Self {
            browser: Some(Arc::new(StubBrowser {
                connected: AtomicBool::new(connected),
            })),
        })
    }
}

#[async_trait]
impl BrowserProvider for StubProvider {
    async fn acquire(&self) -> Result<Arc<dyn BrowserHandle>> {
        match &self.browser {
            Some(browser) => {
                let handle: Arc<dyn BrowserHandle> = browser.clone();
                Ok(handle)
            }
            None => Err(BrowserError::LaunchFailed("no chrome in test".to_string()).into()),
        }
    }
}

pub const TEST_BODY_LIMIT: usize = 100 * 1024;

pub fn app(renderer: Arc<StubRenderer>, provider: Arc<StubProvider>) -> Router {
    app_with_limit(renderer, provider, TEST_BODY_LIMIT)
}

pub fn app_with_limit(
    renderer: Arc<StubRenderer>,
    provider: Arc<StubProvider>,
    body_limit: usize,
) -> Router {
    build_router(
        AppState::new(renderer, provider),
        RouterConfig {
            body_limit,
            mode: RunMode::Production,
        },
    )
}

pub fn app_in_development(renderer: Arc<StubRenderer>, provider: Arc<StubProvider>) -> Router {
    build_router(
        AppState::new(renderer, provider),
        RouterConfig {
            body_limit: TEST_BODY_LIMIT,
            mode: RunMode::Development,
        },
    )
}

pub fn post_json(uri: &str, body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.into()))
        .expect("request should build")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("request should build")
}
