//! HTTP handlers
//!
//! Every handler returns `Result<_, AppError>`; failures are turned into the
//! client response in exactly one place, [`crate::server::AppError`].

pub mod live;
pub mod render;
pub mod request;

pub use live::live_handler;
pub use render::{image_handler, pdf_handler};
pub use request::RenderRequest;
