//! Browser lifecycle management
//!
//! This module owns the headless browser: it is launched lazily on the first
//! [`BrowserProvider::acquire`] call and reused for every request after that.

use crate::error::{BrowserError, Error, RenderError, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as CdpBrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OnceCell};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// A connected browser as seen by the HTTP layer.
pub trait BrowserHandle: Send + Sync {
    /// Whether the browser connection is still alive
    fn is_connected(&self) -> bool;
}

/// Hands out the shared browser, starting it on first use.
#[async_trait]
pub trait BrowserProvider: Send + Sync {
    /// Get the shared browser handle, launching the browser if needed
    async fn acquire(&self) -> Result<Arc<dyn BrowserHandle>>;
}

/// Configuration for browser launch
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run in headless mode (default: true)
    pub headless: bool,
    /// Browser window width (default: 1280)
    pub width: u32,
    /// Browser window height (default: 720)
    pub height: u32,
    /// Enable sandbox (default: true)
    pub sandbox: bool,
    /// Path to Chrome/Chromium executable (None = auto-detect)
    pub chrome_path: Option<String>,
    /// Additional Chrome arguments
    pub extra_args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            width: 1280,
            height: 720,
            sandbox: true,
            chrome_path: None,
            extra_args: Vec::new(),
        }
    }
}

impl BrowserConfig {
    /// Create a new config builder
    pub fn builder() -> BrowserConfigBuilder {
        BrowserConfigBuilder::default()
    }
}

/// Builder for BrowserConfig
#[derive(Default)]
pub struct BrowserConfigBuilder {
    config: BrowserConfig,
}

impl BrowserConfigBuilder {
    /// Set headless mode
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    /// Set viewport dimensions
    pub fn viewport(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    /// Enable/disable sandbox
    pub fn sandbox(mut self, sandbox: bool) -> Self {
        self.config.sandbox = sandbox;
        self
    }

    /// Set Chrome path
    pub fn chrome_path<S: Into<String>>(mut self, path: S) -> Self {
        self.config.chrome_path = Some(path.into());
        self
    }

    /// Add extra Chrome argument
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.config.extra_args.push(arg.into());
        self
    }

    /// Build the config
    pub fn build(self) -> BrowserConfig {
        self.config
    }
}

/// A launched Chromium instance and its CDP event loop
pub struct ChromiumBrowser {
    browser: Mutex<Browser>,
    handler: Mutex<Option<JoinHandle<()>>>,
    connected: Arc<AtomicBool>,
}

impl ChromiumBrowser {
    /// Launch a browser with the given config
    #[instrument(skip(config))]
    pub async fn launch(config: &BrowserConfig) -> Result<Self> {
        info!(
            headless = config.headless,
            sandbox = config.sandbox,
            "Launching browser"
        );

        let mut builder = CdpBrowserConfig::builder().viewport(
            chromiumoxide::handler::viewport::Viewport {
                width: config.width,
                height: config.height,
                device_scale_factor: None,
                emulating_mobile: false,
                is_landscape: true,
                has_touch: false,
            },
        );

        if !config.headless {
            builder = builder.with_head();
        }

        if !config.sandbox {
            builder = builder.arg("--no-sandbox");
        }

        if let Some(ref path) = config.chrome_path {
            builder = builder.chrome_executable(path);
        }

        for arg in &config.extra_args {
            builder = builder.arg(arg);
        }

        let cdp_config = builder.build().map_err(BrowserError::ConfigError)?;

        let (browser, mut handler) = Browser::launch(cdp_config)
            .await
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        let connected = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&connected);

        // The handler stream ends once the websocket to the browser is gone.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "Browser handler event error");
                }
            }
            flag.store(false, Ordering::SeqCst);
            warn!("Browser handler finished");
        });

        info!("Browser launched successfully");

        Ok(Self {
            browser: Mutex::new(browser),
            handler: Mutex::new(Some(handler_task)),
            connected,
        })
    }

    /// Open a new blank page
    #[instrument(skip(self))]
    pub async fn new_page(&self) -> Result<Page> {
        if !self.is_connected() {
            return Err(BrowserError::Disconnected.into());
        }

        let page = self
            .browser
            .lock()
            .await
            .new_page("about:blank")
            .await
            .map_err(|e| RenderError::PageCreationFailed(e.to_string()))?;

        debug!("Created new page");
        Ok(page)
    }

    /// Close the browser and wait briefly for its event loop to stop
    #[instrument(skip(self))]
    pub async fn close(&self) -> Result<()> {
        info!("Closing browser");

        self.browser
            .lock()
            .await
            .close()
            .await
            .map_err(|e| Error::cdp(e.to_string()))?;

        if let Some(handler) = self.handler.lock().await.take() {
            let _ = tokio::time::timeout(Duration::from_secs(5), handler).await;
        }

        self.connected.store(false, Ordering::SeqCst);
        info!("Browser closed");
        Ok(())
    }
}

impl BrowserHandle for ChromiumBrowser {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

/// Lazily launches one [`ChromiumBrowser`] and shares it
pub struct ChromiumProvider {
    config: BrowserConfig,
    browser: OnceCell<Arc<ChromiumBrowser>>,
}

impl ChromiumProvider {
    /// Create a provider; nothing is launched until the first acquire
    pub fn new(config: BrowserConfig) -> Self {
        Self {
            config,
            browser: OnceCell::new(),
        }
    }

    /// Whether the browser has been launched yet
    pub fn is_launched(&self) -> bool {
        self.browser.initialized()
    }

    /// Get the shared browser, launching it on first use
    pub async fn browser(&self) -> Result<Arc<ChromiumBrowser>> {
        let browser = self
            .browser
            .get_or_try_init(|| async {
                ChromiumBrowser::launch(&self.config).await.map(Arc::new)
            })
            .await?;
        Ok(Arc::clone(browser))
    }

    /// Close the browser if it was ever launched
    pub async fn shutdown(&self) -> Result<()> {
        match self.browser.get() {
            Some(browser) => browser.close().await,
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BrowserProvider for ChromiumProvider {
    async fn acquire(&self) -> Result<Arc<dyn BrowserHandle>> {
        let browser: Arc<dyn BrowserHandle> = self.browser().await?;
        Ok(browser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_config_default() {
        let config = BrowserConfig::default();
        assert!(config.headless);
        assert_eq!(config.width, 1280);
        assert_eq!(config.height, 720);
        assert!(config.sandbox);
        assert!(config.chrome_path.is_none());
    }

    #[test]
    fn test_browser_config_builder() {
        let config = BrowserConfig::builder()
            .headless(false)
            .viewport(800, 600)
            .sandbox(false)
            .chrome_path("/usr/bin/chromium")
            .arg("--disable-gpu")
            .build();

        assert!(!config.headless);
        assert_eq!(config.width, 800);
        assert_eq!(config.height, 600);
        assert!(!config.sandbox);
        assert_eq!(config.chrome_path.as_deref(), Some("/usr/bin/chromium"));
        assert_eq!(config.extra_args, vec!["--disable-gpu"]);
    }

    #[tokio::test]
    async fn test_provider_is_lazy() {
        let provider = ChromiumProvider::new(BrowserConfig::default());
        assert!(!provider.is_launched());
        // Shutting down a provider that never launched is a no-op
        provider.shutdown().await.unwrap();
    }
}
