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

//! Shared types for the C'Com website.
//!
//! This crate defines the contract between the form relay API, its clients
//! and the pricing widget: request and response bodies for the two form
//! endpoints, the error envelope, and the pricing configuration rendered by
//! the server into the page. It is intentionally framework-agnostic.

pub mod error;
pub mod requests;
pub mod responses;
pub mod tarifs;

pub use error::APIError;
pub use responses::SubmitResponse;
pub use tarifs::{PlanConfig, PlanDetailPayload, TarifsConfig};
