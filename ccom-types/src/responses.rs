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

//! Response types for the form endpoints.
//!
//! Both endpoints answer with the same small envelope:
//! - On success: `{ "success": true }`
//! - On failure: `{ "success": false, "code": "...", "message": "..." }`

use serde::{Deserialize, Serialize};

use crate::error::APIError;

/// Response envelope for `POST /api/contact` and `POST /api/callback`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SubmitResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SubmitResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            code: None,
            message: None,
        }
    }

    pub fn error(err: APIError) -> Self {
        Self {
            success: false,
            code: Some(err.code),
            message: Some(err.message),
        }
    }
}
