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

//! Request types for the form endpoints.
//!
//! Submissions come from hand-written HTML forms, so decoding is lenient:
//! identifiers that are not strings are ignored rather than rejected, and
//! field values of any JSON type are normalized to trimmed strings.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Request body for `POST /api/contact`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    /// Slug of the formula (plan) the visitor asked about.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub formula_id: Option<String>,

    /// Display label of the formula, used in place of the id when present.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub formula_label: Option<String>,

    /// Legacy flat field map (`{ "email": "..." }`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Map<String, Value>>,

    /// Ordered field entries as rendered by the contact form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<Option<ContactEntry>>>,
}

/// One answered field of the contact form.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ContactEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub label: Option<String>,
    #[serde(default)]
    pub value: Value,
}

/// A normalized `key = value` pair extracted from a [`ContactRequest`].
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SubmittedField {
    pub key: String,
    pub value: String,
}

/// Request body for `POST /api/callback`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct CallbackRequest {
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone: Option<String>,
}

impl ContactRequest {
    /// Trimmed formula id, `None` when missing or blank.
    pub fn formula_id(&self) -> Option<&str> {
        non_blank(self.formula_id.as_deref())
    }

    /// Trimmed formula label, `None` when missing or blank.
    pub fn formula_label(&self) -> Option<&str> {
        non_blank(self.formula_label.as_deref())
    }

    /// Extract the submitted fields in form order.
    ///
    /// The legacy `fields` map wins when it yields at least one key; otherwise
    /// `entries` are keyed by their `id`, falling back to their `label`.
    /// Blank keys are skipped and a repeated key keeps its first position with
    /// the last value.
    pub fn collect_fields(&self) -> Vec<SubmittedField> {
        let mut fields = Vec::new();

        if let Some(map) = &self.fields {
            for (key, value) in map {
                push_field(&mut fields, key.trim(), normalize_value(value));
            }
        }

        if fields.is_empty() {
            for entry in self.entries.iter().flatten().flatten() {
                let key = non_blank(entry.id.as_deref())
                    .or_else(|| entry.label.as_deref().map(str::trim))
                    .unwrap_or_default();
                push_field(&mut fields, key, normalize_value(&entry.value));
            }
        }

        fields
    }
}

impl CallbackRequest {
    /// Trimmed `(name, phone)` when both are present and non-blank.
    pub fn contact(&self) -> Option<(&str, &str)> {
        let name = non_blank(self.name.as_deref())?;
        let phone = non_blank(self.phone.as_deref())?;
        Some((name, phone))
    }
}

fn push_field(fields: &mut Vec<SubmittedField>, key: &str, value: String) {
    if key.is_empty() {
        return;
    }
    match fields.iter_mut().find(|f| f.key == key) {
        Some(existing) => existing.value = value,
        None => fields.push(SubmittedField {
            key: key.to_string(),
            value,
        }),
    }
}

/// Render any JSON value as a trimmed string (`null` becomes empty).
pub fn normalize_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(normalize_value)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Keep string values and drop anything else instead of failing the whole body.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}
