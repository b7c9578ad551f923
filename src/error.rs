//! Error types for the render service
//!
//! Library-level failures are modelled with `thiserror` enums. The HTTP layer
//! wraps them in [`crate::server::AppError`], which is the only place that
//! decides what a client gets to see.

use thiserror::Error;

/// The main error type for rendering and browser operations
#[derive(Error, Debug)]
pub enum Error {
    /// Browser-related errors
    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    /// Rendering errors (PDF, screenshot)
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// ChromiumOxide errors
    #[error("CDP error: {0}")]
    Cdp(String),
}

/// Browser lifecycle errors
#[derive(Error, Debug)]
pub enum BrowserError {
    /// Failed to launch browser
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Browser configuration error
    #[error("Invalid browser configuration: {0}")]
    ConfigError(String),

    /// Browser connection lost
    #[error("Browser disconnected")]
    Disconnected,
}

/// Errors raised while turning HTML into bytes
#[derive(Error, Debug)]
pub enum RenderError {
    /// Failed to create new page/tab
    #[error("Failed to create page: {0}")]
    PageCreationFailed(String),

    /// Setting the page content failed
    #[error("Failed to load content: {0}")]
    ContentFailed(String),

    /// PDF generation failed
    #[error("PDF generation failed: {0}")]
    PdfFailed(String),

    /// Screenshot failed
    #[error("Screenshot capture failed: {0}")]
    ScreenshotFailed(String),

    /// Options could not be mapped onto the renderer's parameters
    #[error("Invalid render options: {0}")]
    InvalidOptions(String),
}

/// Result type alias for render service operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a CDP error from a string
    pub fn cdp<S: Into<String>>(msg: S) -> Self {
        Error::Cdp(msg.into())
    }
}

/// Convert chromiumoxide errors
impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Cdp(err.to_string())
    }
}
