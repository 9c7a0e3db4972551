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

//! Quantity constraints of an option card.
//!
//! A card may declare `min`, `max` and `step` as text attributes; the pricing
//! configuration may override any of them with a number. The override wins,
//! then the declared attribute, then the default (`0`, unbounded, `1`).

use ccom_types::tarifs::ConstraintOverride;

/// Normalized `{min, max, step}` of an option. `max: None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionConstraint {
    pub min: f64,
    pub max: Option<f64>,
    pub step: f64,
}

impl Default for OptionConstraint {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: None,
            step: 1.0,
        }
    }
}

/// Bounds as declared on the card markup, still unparsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredConstraint {
    pub min: Option<String>,
    pub max: Option<String>,
    pub step: Option<String>,
}

impl DeclaredConstraint {
    pub fn new(min: Option<&str>, max: Option<&str>, step: Option<&str>) -> Self {
        Self {
            min: min.map(str::to_string),
            max: max.map(str::to_string),
            step: step.map(str::to_string),
        }
    }
}

impl OptionConstraint {
    /// Merge declared attributes with an optional configuration override.
    ///
    /// A `max` below `min` collapses to `min` so that the clamped range is
    /// never empty.
    pub fn resolve(declared: &DeclaredConstraint, overrides: Option<&ConstraintOverride>) -> Self {
        let pick = |over: Option<f64>, attr: &Option<String>| {
            finite(over).or_else(|| parse_finite(attr.as_deref()))
        };

        let min = pick(overrides.and_then(|o| o.min), &declared.min).unwrap_or(0.0);
        let max = pick(overrides.and_then(|o| o.max), &declared.max).map(|max| max.max(min));
        let step = pick(overrides.and_then(|o| o.step), &declared.step)
            .filter(|step| *step > 0.0)
            .unwrap_or(1.0);

        Self { min, max, step }
    }

    /// Upper bound, `+inf` when unbounded.
    pub fn upper(&self) -> f64 {
        self.max.unwrap_or(f64::INFINITY)
    }

    pub fn clamp(&self, value: f64) -> f64 {
        clamp_quantity(value, self.min, self.max)
    }

    pub fn at_min(&self, quantity: f64) -> bool {
        quantity <= self.min
    }

    pub fn at_max(&self, quantity: f64) -> bool {
        quantity >= self.upper()
    }
}

/// Clamp `value` into `[min, max]`; non-finite input falls back to `min`.
pub fn clamp_quantity(value: f64, min: f64, max: Option<f64>) -> f64 {
    if !value.is_finite() {
        return min;
    }
    value.max(min).min(max.unwrap_or(f64::INFINITY))
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn parse_finite(raw: Option<&str>) -> Option<f64> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    finite(raw.parse::<f64>().ok())
}
