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

//! Error types for the forms client.

use ccom_types::error::GENERIC_FAILURE_MESSAGE;
use thiserror::Error;

/// Errors returned by [`FormsClient`](crate::FormsClient) methods.
#[derive(Debug, Error)]
pub enum FormsError {
    /// The server answered with a `{ "success": false }` envelope.
    #[error("Submission rejected ({status}): {}", code.as_deref().unwrap_or("UNKNOWN"))]
    Rejected {
        status: u16,
        code: Option<String>,
        message: Option<String>,
    },

    /// A non-success status without a readable envelope.
    #[error("Server error ({status}): {body}")]
    ServerError { status: u16, body: String },

    /// A network or transport error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A submission from the same form is still in flight.
    #[error("A submission is already in progress")]
    Busy,
}

impl FormsError {
    /// Machine-readable code sent by the server, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            FormsError::Rejected { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Text for the form's visible error element.
    ///
    /// The server's message when it sent one, otherwise the generic failure
    /// message. Transport details are never shown.
    pub fn user_message(&self) -> &str {
        match self {
            FormsError::Rejected {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message,
            _ => GENERIC_FAILURE_MESSAGE,
        }
    }
}
