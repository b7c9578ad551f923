//! HTML rendering
//!
//! Turns an HTML string into PDF or JPEG bytes by loading it into a fresh
//! page of the shared browser.

use crate::browser::ChromiumProvider;
use crate::error::{Error, RenderError, Result};
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::{CaptureScreenshotFormat, PrintToPdfParams};
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Renders HTML into binary documents.
///
/// `options` is passed through from the request untouched; `None` means the
/// client sent no options at all, which is not the same as an empty object.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Render HTML to a PDF document
    async fn render_pdf(&self, html: &str, options: Option<&Value>) -> Result<Vec<u8>>;

    /// Render HTML to a JPEG image
    async fn render_image(&self, html: &str, options: Option<&Value>) -> Result<Vec<u8>>;
}

/// Kind of document a render produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderKind {
    /// PDF document
    Pdf,
    /// JPEG screenshot
    Image,
}

impl RenderKind {
    /// MIME type sent back to the client
    pub fn content_type(&self) -> &'static str {
        match self {
            RenderKind::Pdf => "application/pdf",
            RenderKind::Image => "image/jpeg",
        }
    }

    /// Short label used in logs and metrics
    pub fn label(&self) -> &'static str {
        match self {
            RenderKind::Pdf => "pdf",
            RenderKind::Image => "image",
        }
    }

    /// Dispatch to the matching renderer operation
    pub async fn render(
        &self,
        renderer: &dyn Renderer,
        html: &str,
        options: Option<&Value>,
    ) -> Result<Vec<u8>> {
        match self {
            RenderKind::Pdf => renderer.render_pdf(html, options).await,
            RenderKind::Image => renderer.render_image(html, options).await,
        }
    }
}

/// Screenshot options understood by [`ChromiumRenderer::render_image`]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageOptions {
    /// JPEG quality (0-100)
    #[serde(default = "default_quality")]
    pub quality: u8,
    /// Capture the whole document instead of just the viewport
    #[serde(default = "default_true")]
    pub full_page: bool,
    /// Render with a transparent default background
    #[serde(default)]
    pub omit_background: bool,
}

fn default_quality() -> u8 {
    80
}

fn default_true() -> bool {
    true
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            quality: default_quality(),
            full_page: true,
            omit_background: false,
        }
    }
}

impl ImageOptions {
    /// Read screenshot options from the raw request value
    pub fn from_value(options: Option<&Value>) -> Result<Self> {
        let Some(value) = options else {
            return Ok(Self::default());
        };

        let opts: Self = serde_json::from_value(value.clone())
            .map_err(|e| RenderError::InvalidOptions(e.to_string()))?;

        if opts.quality > 100 {
            return Err(RenderError::InvalidOptions(format!(
                "quality must be between 0 and 100, got {}",
                opts.quality
            ))
            .into());
        }

        Ok(opts)
    }

    fn to_params(&self) -> ScreenshotParams {
        ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Jpeg)
            .quality(self.quality as i64)
            .full_page(self.full_page)
            .omit_background(self.omit_background)
            .build()
    }
}

/// Map the raw request value onto CDP `Page.printToPDF` parameters.
///
/// Without options the background is printed; an explicit object is taken
/// as-is, so `{}` gets Chromium's own defaults.
pub fn pdf_params(options: Option<&Value>) -> Result<PrintToPdfParams> {
    match options {
        None => Ok(PrintToPdfParams::builder().print_background(true).build()),
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|e| Error::from(RenderError::InvalidOptions(e.to_string()))),
    }
}

/// [`Renderer`] backed by the shared Chromium instance
pub struct ChromiumRenderer {
    provider: Arc<ChromiumProvider>,
}

impl ChromiumRenderer {
    /// Create a renderer drawing pages from `provider`
    pub fn new(provider: Arc<ChromiumProvider>) -> Self {
        Self { provider }
    }

    async fn open_page(&self, html: &str) -> Result<Page> {
        let browser = self.provider.browser().await?;
        let page = browser.new_page().await?;

        if let Err(e) = page.set_content(html).await {
            close_page(page).await;
            return Err(RenderError::ContentFailed(e.to_string()).into());
        }

        Ok(page)
    }
}

async fn close_page(page: Page) {
    if let Err(e) = page.close().await {
        warn!(error = %e, "Failed to close page");
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    #[instrument(skip_all, fields(html_len = html.len()))]
    async fn render_pdf(&self, html: &str, options: Option<&Value>) -> Result<Vec<u8>> {
        info!("Generating PDF");

        let params = pdf_params(options)?;
        let page = self.open_page(html).await?;
        let result = page.pdf(params).await;
        close_page(page).await;

        let data = result.map_err(|e| RenderError::PdfFailed(e.to_string()))?;
        debug!("PDF generated: {} bytes", data.len());
        Ok(data)
    }

    #[instrument(skip_all, fields(html_len = html.len()))]
    async fn render_image(&self, html: &str, options: Option<&Value>) -> Result<Vec<u8>> {
        info!("Capturing screenshot");

        let params = ImageOptions::from_value(options)?.to_params();
        let page = self.open_page(html).await?;
        let result = page.screenshot(params).await;
        close_page(page).await;

        let data = result.map_err(|e| RenderError::ScreenshotFailed(e.to_string()))?;
        debug!("Screenshot captured: {} bytes", data.len());
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_kind_content_type() {
        assert_eq!(RenderKind::Pdf.content_type(), "application/pdf");
        assert_eq!(RenderKind::Image.content_type(), "image/jpeg");
        assert_eq!(RenderKind::Pdf.label(), "pdf");
    }

    #[test]
    fn test_image_options_default() {
        let opts = ImageOptions::from_value(None).unwrap();
        assert_eq!(opts.quality, 80);
        assert!(opts.full_page);
        assert!(!opts.omit_background);
    }

    #[test]
    fn test_image_options_from_value() {
        let value = json!({ "quality": 55, "fullPage": false });
        let opts = ImageOptions::from_value(Some(&value)).unwrap();
        assert_eq!(opts.quality, 55);
        assert!(!opts.full_page);
    }

    #[test]
    fn test_image_options_rejects_bad_quality() {
        let value = json!({ "quality": 101 });
        assert!(ImageOptions::from_value(Some(&value)).is_err());

        let value = json!({ "quality": "high" });
        assert!(ImageOptions::from_value(Some(&value)).is_err());
    }

    #[test]
    fn test_pdf_params_default_prints_background() {
        let params = pdf_params(None).unwrap();
        assert_eq!(params.print_background, Some(true));
    }

    #[test]
    fn test_pdf_params_empty_object_is_not_default() {
        let value = json!({});
        let params = pdf_params(Some(&value)).unwrap();
        assert_eq!(params.print_background, None);
    }

    #[test]
    fn test_pdf_params_from_value() {
        let value = json!({ "landscape": true, "paperWidth": 8.5, "pageRanges": "1-2" });
        let params = pdf_params(Some(&value)).unwrap();
        assert_eq!(params.landscape, Some(true));
        assert_eq!(params.paper_width, Some(8.5));
        assert_eq!(params.page_ranges.as_deref(), Some("1-2"));
    }

    #[test]
    fn test_pdf_params_rejects_wrong_types() {
        let value = json!({ "landscape": "sideways" });
        assert!(pdf_params(Some(&value)).is_err());
    }
}
