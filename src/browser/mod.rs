//! Browser automation module
//!
//! The HTTP layer only sees the [`BrowserProvider`] and [`Renderer`] traits.
//! The Chromium-backed implementations live here as well and are wired up in
//! `main`.

pub mod capture;
pub mod controller;

pub use capture::{pdf_params, ChromiumRenderer, ImageOptions, RenderKind, Renderer};
pub use controller::{
    BrowserConfig, BrowserConfigBuilder, BrowserHandle, BrowserProvider, ChromiumBrowser,
    ChromiumProvider,
};
