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

//! Form API library.
//!
//! This crate provides the Axum router, application state, configuration and
//! spreadsheet backends for the contact and callback forms. The binary entry
//! point (`main.rs`) is a thin wrapper that calls into this library.

pub mod cli_args;
pub mod config;
pub mod error;
pub mod payload;
pub mod routes;
pub mod script_template;
pub mod sheets;
pub mod state;
