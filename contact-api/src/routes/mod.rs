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

//! Axum router configuration for the form endpoints.

pub mod callback;
pub mod contact;
pub mod health;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::error::AppError;
use crate::sheets::SheetBackend;
use crate::state::AppState;

/// Build the full application router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/contact", post(contact::submit_contact))
        .route("/api/callback", post(callback::submit_callback))
        .route("/healthz", get(health::healthz))
}

/// The configured backend, or a 500 when the deployment has none.
fn backend(state: &AppState) -> Result<Arc<dyn SheetBackend>, AppError> {
    state.backend.clone().ok_or_else(|| {
        tracing::error!("No spreadsheet backend configured");
        AppError::submission_failed()
    })
}
