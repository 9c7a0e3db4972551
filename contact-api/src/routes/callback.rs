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

//! Handler for `POST /api/callback`.

use axum::{extract::State, Json};
use ccom_types::{requests::CallbackRequest, SubmitResponse};

use crate::error::AppError;
use crate::payload::FormBody;
use crate::sheets::{timestamp_now, CallbackSubmission};
use crate::state::AppState;

/// POST /api/callback
pub async fn submit_callback(
    State(state): State<AppState>,
    FormBody(body): FormBody<CallbackRequest>,
) -> Result<Json<SubmitResponse>, AppError> {
    let backend = super::backend(&state)?;
    let (name, phone) = body
        .contact()
        .ok_or_else(AppError::missing_callback_fields)?;

    let submission = CallbackSubmission {
        timestamp: timestamp_now(),
        name: name.to_string(),
        phone: phone.to_string(),
    };
    backend.append_callback(&submission).await?;
    tracing::info!("Callback request recorded via {}", backend.name());

    Ok(Json(SubmitResponse::ok()))
}
