//! Shared state handed to every handler.

use std::path::PathBuf;
use std::sync::Arc;

use clinicdesk_core::Database;

use crate::error::WebError;
use crate::flash::FlashSigner;
use crate::render::{JsonRenderer, Renderer};

/// Cloned into each request. Holds no connection: handlers open their own.
#[derive(Clone)]
pub struct AppState {
    pub db_path: Arc<PathBuf>,
    pub renderer: Arc<dyn Renderer>,
    pub flash: FlashSigner,
}

impl AppState {
    pub fn new(db_path: impl Into<PathBuf>, flash_secret: &str) -> Self {
        Self {
            db_path: Arc::new(db_path.into()),
            renderer: Arc::new(JsonRenderer),
            flash: FlashSigner::new(flash_secret),
        }
    }

    /// Open a connection for the scope of one request; closed on drop.
    pub fn open_db(&self) -> Result<Database, WebError> {
        Database::connect(self.db_path.as_path()).map_err(WebError::from)
    }
}
