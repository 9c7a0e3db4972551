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

//! Contact and callback submissions.

use std::future::Future;

use ccom_types::requests::{CallbackRequest, ContactRequest};

use crate::error::FormsError;
use crate::submit::SubmitState;
use crate::{parse_submit_response, FormsClient};

impl FormsClient {
    /// Send the contact form.
    ///
    /// Calls `POST /api/contact`.
    pub async fn submit_contact(&self, request: &ContactRequest) -> Result<(), FormsError> {
        let response = self.post("/api/contact").json(request).send().await?;
        parse_submit_response(response).await
    }

    /// Send the callback form.
    ///
    /// Calls `POST /api/callback`.
    pub async fn submit_callback(&self, request: &CallbackRequest) -> Result<(), FormsError> {
        let response = self.post("/api/callback").json(request).send().await?;
        parse_submit_response(response).await
    }

    /// [`submit_contact`](Self::submit_contact) with the form's submit
    /// button disabled while the request is in flight.
    pub async fn send_contact(
        &self,
        button: &SubmitState,
        request: &ContactRequest,
    ) -> Result<(), FormsError> {
        guarded("contact", button, self.submit_contact(request)).await
    }

    /// [`submit_callback`](Self::submit_callback) with the form's submit
    /// button disabled while the request is in flight.
    pub async fn send_callback(
        &self,
        button: &SubmitState,
        request: &CallbackRequest,
    ) -> Result<(), FormsError> {
        guarded("callback", button, self.submit_callback(request)).await
    }
}

async fn guarded(
    form: &str,
    button: &SubmitState,
    submission: impl Future<Output = Result<(), FormsError>>,
) -> Result<(), FormsError> {
    let _guard = button.begin().ok_or(FormsError::Busy)?;
    let result = submission.await;
    if let Err(e) = &result {
        log::error!("Failed to send {form} form: {e}");
    }
    result
}
