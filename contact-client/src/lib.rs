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

//! Cross-platform REST client for the C'Com contact and callback forms.
//!
//! Works on WASM (browser), desktop, and mobile targets via [`reqwest`].
//!
//! # Example
//!
//! ```no_run
//! use ccom_types::requests::CallbackRequest;
//! use contact_client::{FormsClient, SubmitState};
//!
//! # async fn example() {
//! let client = FormsClient::new("https://www.ccom.fr");
//! let button = SubmitState::new();
//!
//! let request = CallbackRequest {
//!     name: Some("Léa".to_string()),
//!     phone: Some("06 01 02 03 04".to_string()),
//! };
//! if let Err(e) = client.send_callback(&button, &request).await {
//!     println!("{}", e.user_message());
//! }
//! # }
//! ```

pub mod error;
pub mod forms;
pub mod submit;

pub use ccom_types;
pub use error::FormsError;
pub use submit::{SubmitGuard, SubmitState};

use ccom_types::responses::SubmitResponse;
use reqwest::Client;

/// A typed REST client for the form endpoints.
#[derive(Debug, Clone)]
pub struct FormsClient {
    base_url: String,
    http: Client,
}

impl FormsClient {
    /// Create a new client pointing at the site's base URL, e.g.
    /// `"http://localhost:8080"`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Build a POST request for `path`.
    pub(crate) fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.http.post(self.url(path))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Map a `SubmitResponse` body to `Ok(())` or a [`FormsError`].
pub(crate) async fn parse_submit_response(response: reqwest::Response) -> Result<(), FormsError> {
    let status = response.status().as_u16();
    let text = response.text().await?;

    match serde_json::from_str::<SubmitResponse>(&text) {
        Ok(body) if body.success && (200..300).contains(&status) => Ok(()),
        Ok(body) => Err(FormsError::Rejected {
            status,
            code: body.code,
            message: body.message,
        }),
        Err(_) => Err(FormsError::ServerError { status, body: text }),
    }
}
