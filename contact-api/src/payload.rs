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

//! Axum extractor decoding form submissions.
//!
//! Browsers post either JSON or `application/x-www-form-urlencoded`. A form
//! body may carry the JSON payload in a single `data` parameter or send flat
//! `key=value` pairs.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::header,
};
use ccom_types::requests::{CallbackRequest, ContactRequest};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use url::form_urlencoded;

use crate::error::AppError;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const DATA_PARAM: &str = "data";

/// A request body accepted by [`FormBody`].
pub trait FormPayload: DeserializeOwned + Default {
    /// Build the payload from flat form parameters.
    fn from_params(params: Map<String, Value>) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(params))
    }
}

impl FormPayload for CallbackRequest {}

impl FormPayload for ContactRequest {
    /// Everything except the formula goes into `fields`.
    fn from_params(params: Map<String, Value>) -> Result<Self, serde_json::Error> {
        let mut body = Map::new();
        let mut fields = Map::new();
        for (key, value) in params {
            let target = if key == "formulaId" || key == "formulaLabel" {
                &mut body
            } else {
                &mut fields
            };
            target.insert(key, value);
        }
        body.insert("fields".to_string(), Value::Object(fields));
        serde_json::from_value(Value::Object(body))
    }
}

/// Extractor yielding the decoded payload. An empty body decodes to
/// `T::default()`; anything unparseable is a 400.
///
/// ```ignore
/// async fn handler(FormBody(body): FormBody<CallbackRequest>) { ... }
/// ```
#[derive(Debug)]
pub struct FormBody<T>(pub T);

impl<S, T> FromRequest<S> for FormBody<T>
where
    S: Send + Sync,
    T: FormPayload,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains(FORM_CONTENT_TYPE));

        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            tracing::warn!("Failed to read request body: {e}");
            AppError::invalid_payload()
        })?;

        decode(&bytes, is_form).map(FormBody).map_err(|e| {
            tracing::warn!("Rejected unparseable submission: {e}");
            AppError::invalid_payload()
        })
    }
}

fn decode<T: FormPayload>(bytes: &[u8], is_form: bool) -> Result<T, serde_json::Error> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    if !is_form {
        return serde_json::from_slice(bytes);
    }

    let mut params = Map::new();
    for (key, value) in form_urlencoded::parse(bytes) {
        if key == DATA_PARAM && !value.is_empty() {
            return serde_json::from_str(&value);
        }
        params.insert(key.into_owned(), Value::String(value.into_owned()));
    }
    T::from_params(params)
}
