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

//! Option state store: current quantity of every option card.
//!
//! Quantities always satisfy their [`OptionConstraint`]. When an option is
//! disabled by a plan restriction its last chosen quantity is remembered so
//! that it can be restored once the option becomes available again.

use std::collections::HashMap;

use ccom_types::tarifs::OptionKind;

use crate::constraint::OptionConstraint;

/// How an option card renders its line price.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceDisplay {
    /// Price of one unit. `None` keeps the static price text.
    pub unit_price: Option<f64>,
    pub suffix: Option<String>,
    /// Static price text rendered by the server.
    pub fallback: String,
}

impl PriceDisplay {
    /// Text of the price node for `quantity`.
    pub fn render(&self, quantity: f64) -> String {
        let unit = match self.unit_price.filter(|u| u.is_finite()) {
            Some(unit) => unit,
            None => return self.fallback.clone(),
        };
        let suffix = self.suffix.as_deref().unwrap_or_default();

        if quantity <= 0.0 {
            return if suffix.is_empty() {
                self.fallback.clone()
            } else {
                format!("0{suffix}")
            };
        }

        format!("{}{suffix}", unit * quantity)
    }
}

/// State of one option card.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionState {
    pub id: String,
    pub kind: OptionKind,
    pub constraint: OptionConstraint,
    pub quantity: f64,
    /// Currently non-interactive, either from the markup or a plan restriction.
    pub disabled: bool,
    /// Disabled in the markup. Never cleared.
    pub originally_disabled: bool,
    /// `false` when the card renders no stepper.
    pub counter_enabled: bool,
    pub pricing: PriceDisplay,
}

/// What the stepper of a card should display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepperView {
    pub value: String,
    pub selected: bool,
    pub disabled: bool,
    pub decrement_disabled: bool,
    pub increment_disabled: bool,
    pub price: String,
}

impl OptionState {
    pub fn stepper(&self) -> StepperView {
        StepperView {
            value: format_quantity(self.quantity),
            selected: self.quantity > 0.0,
            disabled: self.disabled,
            decrement_disabled: self.disabled || self.constraint.at_min(self.quantity),
            increment_disabled: self.disabled || self.constraint.at_max(self.quantity),
            price: self.pricing.render(self.quantity),
        }
    }
}

/// Render a quantity the way it appears in markup and query strings.
pub fn format_quantity(quantity: f64) -> String {
    format!("{quantity}")
}

/// Ordered collection of option states plus the remembered quantities.
#[derive(Debug, Clone, Default)]
pub struct OptionStore {
    options: Vec<OptionState>,
    remembered: HashMap<String, f64>,
}

impl OptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an option; its quantity is clamped into its constraint.
    pub fn insert(&mut self, mut state: OptionState) {
        state.quantity = state.constraint.clamp(state.quantity);
        match self.position(&state.id) {
            Some(index) => self.options[index] = state,
            None => self.options.push(state),
        }
    }

    pub fn get(&self, id: &str) -> Option<&OptionState> {
        self.options.iter().find(|o| o.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionState> {
        self.options.iter()
    }

    /// Clamp `raw` into the option's constraint and store it.
    ///
    /// With `persist` the value is also remembered for later restoration.
    /// Ignores the disabled flag; user-initiated changes go through
    /// [`Self::change_quantity`]. Returns the stored quantity.
    pub fn set_quantity(&mut self, id: &str, raw: f64, persist: bool) -> Option<f64> {
        let index = self.position(id)?;
        let option = &mut self.options[index];
        let quantity = option.constraint.clamp(raw);
        option.quantity = quantity;
        if persist {
            self.remembered.insert(id.to_string(), quantity);
        }
        Some(quantity)
    }

    /// User-initiated change by `delta`.
    ///
    /// Returns the new quantity, or `None` when the option is unknown,
    /// disabled, has no stepper, or the clamped result equals the current one.
    pub fn change_quantity(&mut self, id: &str, delta: f64) -> Option<f64> {
        let option = self.get(id)?;
        if option.disabled || !option.counter_enabled {
            return None;
        }
        let current = option.quantity;
        let next = option.constraint.clamp(current + delta);
        if next == current {
            return None;
        }
        self.set_quantity(id, next, true)
    }

    /// Step up by exactly one `step`.
    pub fn increment(&mut self, id: &str) -> Option<f64> {
        let step = self.get(id)?.constraint.step.abs();
        self.change_quantity(id, step)
    }

    /// Step down by exactly one `step`.
    pub fn decrement(&mut self, id: &str) -> Option<f64> {
        let step = self.get(id)?.constraint.step.abs();
        self.change_quantity(id, -step)
    }

    /// Apply plan availability to one option.
    ///
    /// A disabled option keeps its quantity in memory (unless one is already
    /// remembered) and drops to `min`; a re-enabled option gets its remembered
    /// quantity back. `originally_disabled` always wins over `restricted`.
    pub fn apply_availability(&mut self, id: &str, restricted: bool) {
        let Some(index) = self.position(id) else {
            return;
        };
        let option = &mut self.options[index];
        let disable = option.originally_disabled || restricted;
        option.disabled = disable;

        if disable {
            let current = option.quantity;
            let min = option.constraint.min;
            self.remembered.entry(id.to_string()).or_insert(current);
            self.set_quantity(id, min, false);
        } else {
            let restored = self.remembered.get(id).copied().unwrap_or(option.quantity);
            self.set_quantity(id, restored, true);
        }
    }

    pub fn remembered(&self, id: &str) -> Option<f64> {
        self.remembered.get(id).copied()
    }

    /// Sum of the quantities of every option of `kind`.
    pub fn total(&self, kind: OptionKind) -> f64 {
        self.options
            .iter()
            .filter(|o| o.kind == kind)
            .map(|o| o.quantity)
            .sum()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.options.iter().position(|o| o.id == id)
    }
}
