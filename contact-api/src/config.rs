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

//! Application configuration loaded from environment variables.

use std::env;

/// Default Google OAuth token endpoint for service accounts.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
/// Default Google Sheets REST base URL.
pub const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4";

/// Configuration for the contact API.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the HTTP server (e.g. "0.0.0.0:8080").
    pub listen_addr: String,
    /// Spreadsheet backend. `None` answers every submission with a 500.
    pub backend: Option<BackendConfig>,
}

/// Where accepted submissions are written. Exactly one strategy per deployment.
#[derive(Debug, Clone)]
pub enum BackendConfig {
    /// Direct Google Sheets API calls with a service account.
    ServiceAccount(ServiceAccountConfig),
    /// JSON POST to a deployed Apps Script web app.
    AppsScript(AppsScriptConfig),
}

#[derive(Clone)]
pub struct ServiceAccountConfig {
    pub client_email: String,
    /// PEM private key with real newlines.
    pub private_key: String,
    pub token_uri: String,
    pub api_base: String,
    pub spreadsheet_id: String,
    pub contact_sheet: String,
    pub callback_sheet: String,
}

impl std::fmt::Debug for ServiceAccountConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountConfig")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("token_uri", &self.token_uri)
            .field("api_base", &self.api_base)
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("contact_sheet", &self.contact_sheet)
            .field("callback_sheet", &self.callback_sheet)
            .finish()
    }
}

#[derive(Clone)]
pub struct AppsScriptConfig {
    pub contact_url: Option<String>,
    pub callback_url: Option<String>,
    /// Shared secret added to every relayed payload.
    pub secret: Option<String>,
}

impl std::fmt::Debug for AppsScriptConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppsScriptConfig")
            .field("contact_url", &self.contact_url)
            .field("callback_url", &self.callback_url)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Optional
    /// - `LISTEN_ADDR` (default: `"0.0.0.0:8080"`)
    /// - Service account: `GOOGLE_SERVICE_ACCOUNT_EMAIL`,
    ///   `GOOGLE_SERVICE_ACCOUNT_PRIVATE_KEY`, `GOOGLE_SHEETS_SPREADSHEET_ID`,
    ///   `GOOGLE_SHEETS_CONTACT_SHEET` (default `"Contact"`),
    ///   `GOOGLE_SHEETS_CALLBACK_SHEET` (default `"Rappel"`),
    ///   `GOOGLE_TOKEN_URI`, `GOOGLE_SHEETS_API_BASE`
    /// - Apps Script: `GOOGLE_CONTACT_SCRIPT_URL`, `GOOGLE_CALLBACK_SCRIPT_URL`
    ///   (both fall back to `GOOGLE_APPS_SCRIPT_URL`),
    ///   `GOOGLE_CONTACT_SCRIPT_SECRET`
    ///
    /// The service account wins when `GOOGLE_SERVICE_ACCOUNT_EMAIL` is set.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let listen_addr = var("LISTEN_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string());

        let service_account = var("GOOGLE_SERVICE_ACCOUNT_EMAIL")
            .map(|client_email| {
                Ok::<_, String>(ServiceAccountConfig {
                    client_email,
                    private_key: var("GOOGLE_SERVICE_ACCOUNT_PRIVATE_KEY")
                        .map(|key| key.replace("\\n", "\n"))
                        .ok_or("GOOGLE_SERVICE_ACCOUNT_PRIVATE_KEY required when GOOGLE_SERVICE_ACCOUNT_EMAIL is set")?,
                    spreadsheet_id: var("GOOGLE_SHEETS_SPREADSHEET_ID")
                        .ok_or("GOOGLE_SHEETS_SPREADSHEET_ID required when GOOGLE_SERVICE_ACCOUNT_EMAIL is set")?,
                    contact_sheet: var("GOOGLE_SHEETS_CONTACT_SHEET")
                        .unwrap_or_else(|| "Contact".to_string()),
                    callback_sheet: var("GOOGLE_SHEETS_CALLBACK_SHEET")
                        .unwrap_or_else(|| "Rappel".to_string()),
                    token_uri: var("GOOGLE_TOKEN_URI")
                        .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
                    api_base: var("GOOGLE_SHEETS_API_BASE")
                        .unwrap_or_else(|| DEFAULT_SHEETS_API_BASE.to_string()),
                })
            })
            .transpose()?;

        let backend = match service_account {
            Some(account) => Some(BackendConfig::ServiceAccount(account)),
            None => {
                let shared = var("GOOGLE_APPS_SCRIPT_URL");
                let contact_url = var("GOOGLE_CONTACT_SCRIPT_URL").or_else(|| shared.clone());
                let callback_url = var("GOOGLE_CALLBACK_SCRIPT_URL").or(shared);
                (contact_url.is_some() || callback_url.is_some()).then(|| {
                    BackendConfig::AppsScript(AppsScriptConfig {
                        contact_url,
                        callback_url,
                        secret: var("GOOGLE_CONTACT_SCRIPT_SECRET"),
                    })
                })
            }
        };

        Ok(Self {
            listen_addr,
            backend,
        })
    }
}
