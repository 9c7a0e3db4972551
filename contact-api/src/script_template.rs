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

//! Copy-paste Apps Script for the relay deployment.

/// Script source with `{{...}}` placeholders.
const TEMPLATE: &str = include_str!("../apps-script/ccom-forms.gs");

/// Values substituted into the script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptTemplate {
    pub spreadsheet_id: String,
    pub contact_sheet: String,
    pub callback_sheet: String,
    /// Name of the script property holding the shared secret.
    pub secret_property: String,
    /// Notification addresses. Empty disables the email.
    pub recipients: Vec<String>,
}

impl ScriptTemplate {
    pub fn render(&self) -> String {
        let recipients = self
            .recipients
            .iter()
            .map(|r| format!("'{}'", js_escape(r)))
            .collect::<Vec<_>>()
            .join(", ");

        TEMPLATE
            .replace("{{SPREADSHEET_ID}}", &js_escape(&self.spreadsheet_id))
            .replace("{{CONTACT_SHEET}}", &js_escape(&self.contact_sheet))
            .replace("{{CALLBACK_SHEET}}", &js_escape(&self.callback_sheet))
            .replace("{{SECRET_PROPERTY}}", &js_escape(&self.secret_property))
            .replace("{{RECIPIENTS}}", &recipients)
    }
}

/// Escape a value for a single-quoted JavaScript string.
fn js_escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
}
