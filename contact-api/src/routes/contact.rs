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

//! Handler for `POST /api/contact`.

use axum::{extract::State, Json};
use ccom_types::{requests::ContactRequest, SubmitResponse};

use crate::error::AppError;
use crate::payload::FormBody;
use crate::sheets::{timestamp_now, ContactSubmission};
use crate::state::AppState;

/// Check the request and turn it into a submission.
pub fn validate(body: ContactRequest) -> Result<ContactSubmission, AppError> {
    let formula_id = body.formula_id().ok_or_else(AppError::missing_formula)?;

    let fields = body.collect_fields();
    if fields.iter().all(|f| f.value.is_empty()) {
        return Err(AppError::empty_submission());
    }

    Ok(ContactSubmission {
        timestamp: timestamp_now(),
        formula_id: formula_id.to_string(),
        formula_label: body.formula_label().map(str::to_string),
        fields,
        entries: body.entries,
    })
}

/// POST /api/contact
pub async fn submit_contact(
    State(state): State<AppState>,
    FormBody(body): FormBody<ContactRequest>,
) -> Result<Json<SubmitResponse>, AppError> {
    let backend = super::backend(&state)?;
    let submission = validate(body)?;

    backend.append_contact(&submission).await?;
    tracing::info!(
        "Contact request for {} recorded via {} ({} fields)",
        submission.formula_id,
        backend.name(),
        submission.fields.len()
    );

    Ok(Json(SubmitResponse::ok()))
}
