//! Runtime configuration
//!
//! Everything is read once at startup from the command line, with each flag
//! falling back to an environment variable.

use crate::browser::BrowserConfig;
use clap::{ArgAction, Parser};
use std::convert::Infallible;

/// Default maximum request body size
pub const DEFAULT_BODY_LIMIT: &str = "100kb";

/// HTML render service
#[derive(Parser, Debug, Clone)]
#[command(name = "html-render-service")]
#[command(version)]
#[command(about = "Render HTML to PDF or JPEG through headless Chromium")]
pub struct ServiceArgs {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Host to bind to
    #[arg(short = 'H', long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Maximum accepted request body size (e.g. `100kb`, `1mb`, `2048`)
    #[arg(long, env = "BODY_LIMIT", default_value = DEFAULT_BODY_LIMIT, value_parser = parse_byte_size)]
    pub body_limit: usize,

    /// Runtime mode; `production` switches to terse request logs
    #[arg(long, env = "APP_ENV", default_value = "development", value_parser = parse_run_mode)]
    pub mode: RunMode,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to Chrome/Chromium executable
    #[arg(long, env = "CHROME_PATH")]
    pub chrome_path: Option<String>,

    /// Launch Chromium without its sandbox (needed in most containers)
    #[arg(long, env = "NO_SANDBOX")]
    pub no_sandbox: bool,

    /// Run Chromium in headless mode
    #[arg(long, env = "HEADLESS", default_value_t = true, action = ArgAction::Set)]
    pub headless: bool,

    /// Browser viewport width in pixels
    #[arg(long, env = "VIEWPORT_WIDTH", default_value = "1280")]
    pub viewport_width: u32,

    /// Browser viewport height in pixels
    #[arg(long, env = "VIEWPORT_HEIGHT", default_value = "720")]
    pub viewport_height: u32,

    /// Extra Chromium command-line argument (repeatable, comma-separated in env)
    #[arg(
        long = "chrome-arg",
        env = "CHROME_ARGS",
        value_delimiter = ',',
        allow_hyphen_values = true
    )]
    pub chrome_args: Vec<String>,
}

impl ServiceArgs {
    /// Address the HTTP server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Browser launch settings derived from the arguments
    pub fn browser_config(&self) -> BrowserConfig {
        let mut builder = BrowserConfig::builder()
            .headless(self.headless)
            .viewport(self.viewport_width, self.viewport_height)
            .sandbox(!self.no_sandbox);
        if let Some(ref path) = self.chrome_path {
            builder = builder.chrome_path(path);
        }
        for arg in &self.chrome_args {
            builder = builder.arg(arg);
        }
        builder.build()
    }
}

/// Deployment mode, which controls how requests are logged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Verbose per-request logs
    #[default]
    Development,
    /// One terse line per request
    Production,
}

impl RunMode {
    /// Whether this is the production mode
    pub fn is_production(&self) -> bool {
        matches!(self, RunMode::Production)
    }
}

/// Any value other than `production` means development.
pub fn parse_run_mode(value: &str) -> Result<RunMode, Infallible> {
    if value.trim().eq_ignore_ascii_case("production") {
        Ok(RunMode::Production)
    } else {
        Ok(RunMode::Development)
    }
}

/// Parse a human byte size such as `100kb` or `1.5 MB` into bytes.
///
/// Units are powers of 1024; a bare number is a byte count. Fractional
/// results are floored.
pub fn parse_byte_size(input: &str) -> Result<usize, String> {
    let trimmed = input.trim();
    let split = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split);

    if number.is_empty() {
        return Err(format!("invalid byte size `{input}`: missing number"));
    }

    let value: f64 = number
        .parse()
        .map_err(|_| format!("invalid byte size `{input}`: bad number `{number}`"))?;

    let multiplier: u64 = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "b" => 1,
        "kb" => 1 << 10,
        "mb" => 1 << 20,
        "gb" => 1 << 30,
        "tb" => 1 << 40,
        "pb" => 1 << 50,
        other => return Err(format!("invalid byte size `{input}`: unknown unit `{other}`")),
    };

    let bytes = (value * multiplier as f64).floor();
    if !bytes.is_finite() || bytes > usize::MAX as f64 {
        return Err(format!("invalid byte size `{input}`: too large"));
    }

    Ok(bytes as usize)
}
