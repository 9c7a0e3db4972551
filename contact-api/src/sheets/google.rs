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

//! Google Sheets API backend authenticated with a service account.
//!
//! The service account signs an RS256 assertion which is exchanged for an
//! access token at the token URI. The token is cached until shortly before
//! it expires and shared by all requests.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use ccom_types::requests::normalize_value;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use url::Url;

use super::{CallbackSubmission, ContactSubmission, SheetBackend, SheetError};
use crate::config::ServiceAccountConfig;

/// OAuth scope granting read/write access to spreadsheets.
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
/// Lifetime requested for the signed assertion.
const ASSERTION_TTL_SECS: i64 = 3600;
/// Tokens are refreshed this long before their announced expiry.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    ASSERTION_TTL_SECS as u64
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Option<Vec<Vec<Value>>>,
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + TOKEN_REFRESH_MARGIN < self.expires_at
    }
}

/// Appends rows through `spreadsheets.values.append`.
pub struct GoogleSheets {
    http: Client,
    account: ServiceAccountConfig,
    token: RwLock<Option<CachedToken>>,
}

impl GoogleSheets {
    pub fn new(http: Client, account: ServiceAccountConfig) -> Self {
        Self {
            http,
            account,
            token: RwLock::new(None),
        }
    }

    /// Cached access token, exchanging a fresh assertion when needed.
    async fn access_token(&self) -> Result<String, SheetError> {
        if let Some(token) = self.token.read().await.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.access_token.clone());
        }

        let mut cache = self.token.write().await;
        if let Some(token) = cache.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.access_token.clone());
        }

        let assertion = self.sign_assertion()?;
        let response = self
            .http
            .post(&self.account.token_uri)
            .form(&[
                ("grant_type", JWT_BEARER_GRANT),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;
        let token: TokenResponse = check_status(response).await?.json().await?;
        tracing::debug!("Obtained Google access token valid for {}s", token.expires_in);

        let access_token = token.access_token.clone();
        *cache = Some(CachedToken {
            access_token: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        });
        Ok(access_token)
    }

    fn sign_assertion(&self) -> Result<String, SheetError> {
        let now = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.account.client_email,
            scope: SHEETS_SCOPE,
            aud: &self.account.token_uri,
            iat: now,
            exp: now + ASSERTION_TTL_SECS,
        };
        let key = EncodingKey::from_rsa_pem(self.account.private_key.as_bytes())?;
        Ok(encode(&Header::new(Algorithm::RS256), &claims, &key)?)
    }

    /// First row of `sheet`, empty when the sheet has no header yet.
    async fn read_headers(&self, sheet: &str) -> Result<Vec<String>, SheetError> {
        let url = self.values_url(&header_range(sheet), None)?;
        let response = self
            .http
            .get(url)
            .bearer_auth(self.access_token().await?)
            .send()
            .await?;
        let range: ValueRange = self.checked(response).await?.json().await?;

        Ok(range
            .values
            .and_then(|rows| rows.into_iter().next())
            .map(|row| row.iter().map(normalize_value).collect())
            .unwrap_or_default())
    }

    async fn append_rows(&self, sheet: &str, rows: Vec<Vec<String>>) -> Result<(), SheetError> {
        let url = self.values_url(&sheet_range(sheet), Some("append"))?;
        let response = self
            .http
            .post(url)
            .bearer_auth(self.access_token().await?)
            .json(&json!({ "values": rows }))
            .send()
            .await?;
        self.checked(response).await?;
        Ok(())
    }

    /// `{api_base}/spreadsheets/{id}/values/{range}[:{action}]`.
    fn values_url(&self, range: &str, action: Option<&str>) -> Result<Url, SheetError> {
        let mut url = Url::parse(&self.account.api_base)
            .map_err(|e| SheetError::InvalidEndpoint(format!("{}: {e}", self.account.api_base)))?;
        let last = match action {
            Some(action) => format!("{range}:{action}"),
            None => range.to_string(),
        };
        url.path_segments_mut()
            .map_err(|_| SheetError::InvalidEndpoint(self.account.api_base.clone()))?
            .pop_if_empty()
            .extend([
                "spreadsheets",
                self.account.spreadsheet_id.as_str(),
                "values",
                last.as_str(),
            ]);
        if action.is_some() {
            url.query_pairs_mut()
                .append_pair("valueInputOption", "USER_ENTERED")
                .append_pair("insertDataOption", "INSERT_ROWS");
        }
        Ok(url)
    }

    /// Like [`check_status`], dropping the cached token on a 401.
    async fn checked(&self, response: Response) -> Result<Response, SheetError> {
        if response.status() == StatusCode::UNAUTHORIZED {
            *self.token.write().await = None;
        }
        check_status(response).await
    }
}

#[async_trait]
impl SheetBackend for GoogleSheets {
    async fn append_contact(&self, submission: &ContactSubmission) -> Result<(), SheetError> {
        let sheet = &self.account.contact_sheet;
        let headers = self.read_headers(sheet).await?;

        let rows = if headers.is_empty() {
            tracing::info!("Sheet {sheet:?} has no header row, writing one");
            let headers = submission.header_row();
            let row = submission.row(&headers);
            vec![headers, row]
        } else {
            vec![submission.row(&headers)]
        };

        self.append_rows(sheet, rows).await
    }

    async fn append_callback(&self, submission: &CallbackSubmission) -> Result<(), SheetError> {
        self.append_rows(&self.account.callback_sheet, vec![submission.row()])
            .await
    }

    fn name(&self) -> &'static str {
        "google-sheets"
    }
}

async fn check_status(response: Response) -> Result<Response, SheetError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SheetError::Status {
        status: status.as_u16(),
        body,
    })
}

/// A1 reference of a whole sheet, quoted so names with spaces work.
fn sheet_range(sheet: &str) -> String {
    format!("'{}'", sheet.replace('\'', "''"))
}

fn header_range(sheet: &str) -> String {
    format!("{}!1:1", sheet_range(sheet))
}
