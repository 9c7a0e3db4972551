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

//! Application error type that implements Axum's `IntoResponse`.
//!
//! Every error is returned as a [`SubmitResponse`] with `success: false`,
//! paired with the appropriate HTTP status code. Upstream details are logged,
//! never returned.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ccom_types::{APIError, SubmitResponse};

use crate::sheets::SheetError;

/// Application-level error that pairs an HTTP status code with an [`APIError`].
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub body: APIError,
}

impl AppError {
    pub fn new(status: StatusCode, body: APIError) -> Self {
        Self { status, body }
    }

    pub fn invalid_payload() -> Self {
        Self::new(StatusCode::BAD_REQUEST, APIError::invalid_payload())
    }

    pub fn missing_formula() -> Self {
        Self::new(StatusCode::BAD_REQUEST, APIError::missing_formula())
    }

    pub fn empty_submission() -> Self {
        Self::new(StatusCode::BAD_REQUEST, APIError::empty_submission())
    }

    pub fn missing_callback_fields() -> Self {
        Self::new(StatusCode::BAD_REQUEST, APIError::missing_callback_fields())
    }

    /// Missing configuration or upstream failure.
    pub fn submission_failed() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            APIError::submission_failed(),
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = SubmitResponse::error(self.body);
        (self.status, Json(body)).into_response()
    }
}

impl From<SheetError> for AppError {
    fn from(err: SheetError) -> Self {
        tracing::error!("Spreadsheet backend error: {err}");
        Self::submission_failed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use ccom_types::error::GENERIC_FAILURE_MESSAGE;
    use http_body_util::BodyExt;

    async fn read_error_body(resp: Response) -> (StatusCode, SubmitResponse) {
        let status = resp.status();
        let bytes = Body::new(resp.into_body())
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        let parsed: SubmitResponse =
            serde_json::from_slice(&bytes).expect("deserialize error body");
        (status, parsed)
    }

    #[tokio::test]
    async fn missing_formula_produces_400_with_french_message() {
        let (status, body) = read_error_body(AppError::missing_formula().into_response()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.success);
        assert_eq!(body.code.as_deref(), Some("MISSING_FORMULA"));
        assert_eq!(
            body.message.as_deref(),
            Some("Formule manquante dans la demande.")
        );
    }

    #[tokio::test]
    async fn invalid_payload_produces_400_with_generic_message() {
        let (status, body) = read_error_body(AppError::invalid_payload().into_response()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.message.as_deref(), Some(GENERIC_FAILURE_MESSAGE));
    }

    #[tokio::test]
    async fn sheet_error_is_hidden_behind_500() {
        let err: AppError = SheetError::Status {
            status: 403,
            body: "The caller does not have permission".into(),
        }
        .into();
        let (status, body) = read_error_body(err.into_response()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code.as_deref(), Some("SUBMISSION_FAILED"));
        assert_eq!(body.message.as_deref(), Some(GENERIC_FAILURE_MESSAGE));
    }
}
