/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

//! Shared application state passed to every Axum handler via `State`.

use std::sync::Arc;

use crate::config::Config;
use crate::sheets::{self, SheetBackend};

/// Application state shared across all request handlers.
#[derive(Clone, Default)]
pub struct AppState {
    /// Spreadsheet backend. `None` when the deployment is not configured.
    pub backend: Option<Arc<dyn SheetBackend>>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            backend: config.backend.as_ref().map(sheets::from_config),
        }
    }

    pub fn with_backend(backend: Arc<dyn SheetBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }
}
