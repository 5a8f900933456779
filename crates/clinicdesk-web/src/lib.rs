//! HTTP front end for clinicdesk.
//!
//! Form-driven routes over [`clinicdesk_core`]: client search and registration,
//! appointment booking, the consultation entry workflow and the reporting
//! dashboard. Every request opens its own SQLite connection; pages are produced
//! by a pluggable [`Renderer`] and one-shot notices survive redirects in a
//! signed cookie.

pub mod config;
pub mod error;
pub mod flash;
pub mod forms;
pub mod handlers;
pub mod paths;
pub mod render;
pub mod router;
pub mod state;

pub use config::Config;
pub use error::WebError;
pub use render::{JsonRenderer, Notice, NoticeLevel, Page, RenderError, RenderedPage, Renderer};
pub use router::build_router;
pub use state::AppState;
