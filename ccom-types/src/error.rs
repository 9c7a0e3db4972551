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

//! API error types.
//!
//! Every failed form submission is answered with a [`super::SubmitResponse`]
//! whose `success` is `false` and which carries the error's code and message.

use serde::{Deserialize, Serialize};

/// Generic message shown to visitors when a submission cannot be processed.
pub const GENERIC_FAILURE_MESSAGE: &str = "Impossible d'envoyer votre demande pour le moment.";

/// Structured error returned by the form endpoints.
///
/// The `code` field is a machine-readable identifier (e.g. `"MISSING_FORMULA"`).
/// The `message` field is a French sentence suitable for display on the site.
/// Internal details (upstream bodies, credential problems) never travel in
/// this type; the server logs them instead.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct APIError {
    /// Machine-readable error code.
    pub code: String,

    /// Human-readable error message, in French.
    pub message: String,
}

impl APIError {
    /// The request body could not be decoded.
    pub fn invalid_payload() -> Self {
        Self {
            code: "INVALID_PAYLOAD".to_string(),
            message: GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }

    pub fn missing_formula() -> Self {
        Self {
            code: "MISSING_FORMULA".to_string(),
            message: "Formule manquante dans la demande.".to_string(),
        }
    }

    pub fn empty_submission() -> Self {
        Self {
            code: "EMPTY_SUBMISSION".to_string(),
            message: "Aucune donnée à enregistrer.".to_string(),
        }
    }

    pub fn missing_callback_fields() -> Self {
        Self {
            code: "MISSING_CALLBACK_FIELDS".to_string(),
            message: "Les champs nom et téléphone sont requis.".to_string(),
        }
    }

    /// Configuration or upstream failure. The message stays generic.
    pub fn submission_failed() -> Self {
        Self {
            code: "SUBMISSION_FAILED".to_string(),
            message: GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

impl std::fmt::Display for APIError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for APIError {}
