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

//! Plan catalog and automatic plan selection.

use ccom_types::tarifs::{PlanConfig, PlanDetailPayload};

/// Plan selected when no visual is chosen.
pub const ENTRY_PLAN: &str = "csimple";
/// Plan selected as soon as a video is chosen.
pub const PRO_PLAN: &str = "cpro";

/// Immutable, ordered set of configured plans.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanCatalog {
    plans: Vec<PlanConfig>,
}

impl PlanCatalog {
    /// Build the catalog. Plans with a blank slug are dropped; a repeated slug
    /// keeps its first definition.
    pub fn new(plans: Vec<PlanConfig>) -> Self {
        let mut catalog = Self { plans: Vec::new() };
        for plan in plans {
            if plan.slug.trim().is_empty() || catalog.contains(&plan.slug) {
                log::debug!("ignoring plan with empty or duplicate slug {:?}", plan.slug);
                continue;
            }
            catalog.plans.push(plan);
        }
        catalog
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.get(slug).is_some()
    }

    pub fn get(&self, slug: &str) -> Option<&PlanConfig> {
        self.plans.iter().find(|plan| plan.slug == slug)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlanConfig> {
        self.plans.iter()
    }

    /// The configured default when it exists, else the first plan.
    pub fn default_slug(&self, configured: &str) -> Option<&str> {
        self.get(configured)
            .or_else(|| self.plans.first())
            .map(|plan| plan.slug.as_str())
    }

    /// Derive the active plan from the option totals.
    ///
    /// Starts from [`Self::default_slug`], switches to [`ENTRY_PLAN`] when no
    /// visual is selected, then to [`PRO_PLAN`] when any video is selected.
    /// The video rule is applied last and therefore wins.
    pub fn select(&self, configured_default: &str, base_total: f64, video_total: f64) -> Option<&str> {
        let mut slug = self.default_slug(configured_default)?;

        if base_total <= 0.0 && self.contains(ENTRY_PLAN) {
            slug = ENTRY_PLAN;
        }

        if video_total > 0.0 && self.contains(PRO_PLAN) {
            slug = PRO_PLAN;
        }

        Some(slug)
    }

    /// Payload describing `slug` for the modal.
    pub fn detail(&self, slug: &str) -> PlanDetailPayload {
        self.get(slug)
            .map(PlanDetailPayload::from)
            .unwrap_or_else(|| PlanDetailPayload::bare(slug))
    }
}

/// Title shown on the plan card: the badge when set, else a label derived
/// from the slug (`csimple` becomes `C'SIMPLE`).
pub fn plan_label(plan: Option<&PlanConfig>, slug: &str) -> String {
    if let Some(badge) = plan.and_then(|p| p.badge.as_deref()).map(str::trim) {
        if !badge.is_empty() {
            return badge.to_string();
        }
    }

    let normalized = slug.replace(['-', '_'], " ").to_uppercase();
    let mut chars = normalized.chars();
    match (chars.next(), chars.next()) {
        (Some('C'), Some(second)) if second != '\'' => format!("C'{}", &normalized[1..]),
        _ => normalized,
    }
}

/// Content of the plan card for the active plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanCardView {
    pub slug: String,
    pub title: String,
    /// `None` hides the badge.
    pub badge: Option<String>,
    pub subtitle: String,
    pub price: String,
    /// `None` hides the footnote.
    pub footnote: Option<String>,
    pub description: String,
}

impl PlanCardView {
    pub fn new(catalog: &PlanCatalog, slug: &str) -> Self {
        let plan = catalog.get(slug);
        let text = |value: Option<&Option<String>>| {
            value
                .and_then(|v| v.as_deref())
                .unwrap_or_default()
                .to_string()
        };
        let shown = |value: Option<&Option<String>>| {
            value
                .and_then(|v| v.as_deref())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Self {
            slug: slug.to_string(),
            title: plan_label(plan, slug),
            badge: shown(plan.map(|p| &p.badge)),
            subtitle: text(plan.map(|p| &p.subtitle)),
            price: text(plan.map(|p| &p.price)),
            footnote: shown(plan.map(|p| &p.footnote)),
            description: text(plan.map(|p| &p.description)),
        }
    }
}

/// State of one plan trigger button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanTriggerView {
    pub slug: String,
    pub active: bool,
}

impl PlanTriggerView {
    pub fn aria_pressed(&self) -> &'static str {
        if self.active {
            "true"
        } else {
            "false"
        }
    }
}
