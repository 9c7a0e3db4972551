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

//! Spreadsheet backends receiving accepted submissions.
//!
//! Two interchangeable strategies implement [`SheetBackend`]: direct Google
//! Sheets API calls with a service account ([`google::GoogleSheets`]) and a
//! JSON relay to a deployed Apps Script ([`apps_script::AppsScriptRelay`]).

pub mod apps_script;
pub mod google;

use std::sync::Arc;

use async_trait::async_trait;
use ccom_types::requests::{ContactEntry, SubmittedField};
use chrono::Local;
use thiserror::Error;

use crate::config::BackendConfig;

/// First two columns of the contact sheet; field columns follow.
pub const STATIC_HEADERS: [&str; 2] = ["Date Demande", "Formule"];

/// Failure while writing a submission. Never shown to visitors.
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("no {0} endpoint configured")]
    MissingEndpoint(&'static str),
    #[error("invalid endpoint url: {0}")]
    InvalidEndpoint(String),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("upstream responded with {status}: {body}")]
    Status { status: u16, body: String },
    #[error("upstream rejected the submission: {0}")]
    Rejected(String),
    #[error("failed to sign service account assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// A validated contact form submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactSubmission {
    /// `dd/mm/yyyy hh:mm` in the server's local time.
    pub timestamp: String,
    pub formula_id: String,
    pub formula_label: Option<String>,
    /// Normalized fields in form order.
    pub fields: Vec<SubmittedField>,
    /// Entries as received, relayed untouched.
    pub entries: Option<Vec<Option<ContactEntry>>>,
}

impl ContactSubmission {
    /// Value written in the `Formule` column.
    pub fn formula(&self) -> &str {
        self.formula_label.as_deref().unwrap_or(&self.formula_id)
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
    }

    /// Row matching `headers`: timestamp, formula, then one cell per field
    /// column (empty when the form did not send it).
    pub fn row(&self, headers: &[String]) -> Vec<String> {
        let mut row = vec![self.timestamp.clone(), self.formula().to_string()];
        row.extend(
            headers
                .iter()
                .skip(STATIC_HEADERS.len())
                .map(|header| self.field(header.trim()).unwrap_or_default().to_string()),
        );
        row
    }

    /// Header row for a sheet that has none yet.
    pub fn header_row(&self) -> Vec<String> {
        STATIC_HEADERS
            .iter()
            .map(|h| h.to_string())
            .chain(self.fields.iter().map(|f| f.key.clone()))
            .collect()
    }
}

/// A validated callback request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackSubmission {
    pub timestamp: String,
    pub name: String,
    pub phone: String,
}

impl CallbackSubmission {
    pub fn row(&self) -> Vec<String> {
        vec![self.timestamp.clone(), self.name.clone(), self.phone.clone()]
    }
}

/// Destination of accepted submissions.
#[async_trait]
pub trait SheetBackend: Send + Sync {
    async fn append_contact(&self, submission: &ContactSubmission) -> Result<(), SheetError>;

    async fn append_callback(&self, submission: &CallbackSubmission) -> Result<(), SheetError>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Build the backend selected by the configuration.
pub fn from_config(config: &BackendConfig) -> Arc<dyn SheetBackend> {
    let http = reqwest::Client::new();
    match config {
        BackendConfig::ServiceAccount(account) => {
            Arc::new(google::GoogleSheets::new(http, account.clone()))
        }
        BackendConfig::AppsScript(script) => {
            Arc::new(apps_script::AppsScriptRelay::new(http, script.clone()))
        }
    }
}

/// Submission time as `dd/mm/yyyy hh:mm`.
pub fn timestamp_now() -> String {
    Local::now().format("%d/%m/%Y %H:%M").to_string()
}
