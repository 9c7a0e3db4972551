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

//! Relay to a spreadsheet-side Apps Script deployment.
//!
//! The script owns the spreadsheet; this backend only forwards the validated
//! payload as JSON, with the shared secret the script checks.

use async_trait::async_trait;
use ccom_types::requests::ContactEntry;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Map;

use super::{CallbackSubmission, ContactSubmission, SheetBackend, SheetError};
use crate::config::AppsScriptConfig;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContactRelay<'a> {
    formula_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    formula_label: Option<&'a str>,
    fields: Map<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    entries: Option<&'a [Option<ContactEntry>]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    secret: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct CallbackRelay<'a> {
    timestamp: &'a str,
    name: &'a str,
    phone: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    secret: Option<&'a str>,
}

/// Body the script answers with. Any non-JSON body counts as success when
/// the status is.
#[derive(Debug, Deserialize)]
struct RelayAnswer {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    message: Option<String>,
}

pub struct AppsScriptRelay {
    http: Client,
    config: AppsScriptConfig,
}

impl AppsScriptRelay {
    pub fn new(http: Client, config: AppsScriptConfig) -> Self {
        Self { http, config }
    }

    async fn post<T: Serialize + ?Sized>(&self, url: &str, body: &T) -> Result<(), SheetError> {
        let response = self.http.post(url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(SheetError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        match serde_json::from_str::<RelayAnswer>(&text) {
            Ok(RelayAnswer {
                success: Some(false),
                message,
            }) => Err(SheetError::Rejected(message.unwrap_or_default())),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl SheetBackend for AppsScriptRelay {
    async fn append_contact(&self, submission: &ContactSubmission) -> Result<(), SheetError> {
        let url = self
            .config
            .contact_url
            .as_deref()
            .ok_or(SheetError::MissingEndpoint("contact"))?;

        let fields = submission
            .fields
            .iter()
            .map(|f| (f.key.clone(), f.value.clone().into()))
            .collect();
        let body = ContactRelay {
            formula_id: &submission.formula_id,
            formula_label: submission.formula_label.as_deref(),
            fields,
            entries: submission.entries.as_deref(),
            secret: self.config.secret.as_deref(),
        };
        self.post(url, &body).await
    }

    async fn append_callback(&self, submission: &CallbackSubmission) -> Result<(), SheetError> {
        let url = self
            .config
            .callback_url
            .as_deref()
            .ok_or(SheetError::MissingEndpoint("callback"))?;

        let body = CallbackRelay {
            timestamp: &submission.timestamp,
            name: &submission.name,
            phone: &submission.phone,
            secret: self.config.secret.as_deref(),
        };
        self.post(url, &body).await
    }

    fn name(&self) -> &'static str {
        "apps-script"
    }
}
