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

//! Pricing configuration rendered by the server into the pricing section.
//!
//! The configuration is serialized once, when the page is rendered, and
//! handed to the pricing widget as a typed [`TarifsConfig`]. Field names use
//! camelCase on the wire to match the content collections.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Kind of a purchasable option. Drives automatic plan selection.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    /// Visuals. No base option selected selects the entry plan.
    Base,
    /// Videos. Any video selected selects the pro plan.
    Video,
    #[default]
    Extra,
}

impl OptionKind {
    /// Parse the card's declared type; unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "base" => Some(Self::Base),
            "video" => Some(Self::Video),
            "extra" => Some(Self::Extra),
            _ => None,
        }
    }
}

/// Quantity constraint override for one option. Every bound is optional.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct ConstraintOverride {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub step: Option<f64>,
}

/// A pricing tier.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PlanConfig {
    pub slug: String,
    #[serde(default)]
    pub badge: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub footnote: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub more_info_title: Option<String>,
    #[serde(default)]
    pub more_info_content: Option<String>,
    /// Allow-list of option ids. `None` permits every option.
    #[serde(default)]
    pub available_options: Option<Vec<String>>,
}

impl PlanConfig {
    /// Whether this plan lets the visitor pick `option_id`.
    pub fn permits(&self, option_id: &str) -> bool {
        self.available_options
            .as_ref()
            .map_or(true, |allowed| allowed.iter().any(|id| id == option_id))
    }
}

/// Static content of the "more information" modal.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct ModalContent {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Server-rendered configuration of one pricing section.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TarifsConfig {
    #[serde(default)]
    pub default_plan: String,
    #[serde(default)]
    pub base_option_ids: Vec<String>,
    #[serde(default)]
    pub video_option_ids: Vec<String>,
    /// Initial quantity per option id.
    #[serde(default)]
    pub option_quantities: HashMap<String, f64>,
    #[serde(default)]
    pub option_constraints: HashMap<String, ConstraintOverride>,
    #[serde(default)]
    pub plans: Vec<PlanConfig>,
    #[serde(default)]
    pub modal: Option<ModalContent>,
}

impl TarifsConfig {
    /// Decode the JSON blob embedded in the page.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn plan(&self, slug: &str) -> Option<&PlanConfig> {
        self.plans.iter().find(|plan| plan.slug == slug)
    }

    /// Option kind implied by the id lists, used when a card declares none.
    pub fn kind_of(&self, option_id: &str) -> OptionKind {
        if self.base_option_ids.iter().any(|id| id == option_id) {
            OptionKind::Base
        } else if self.video_option_ids.iter().any(|id| id == option_id) {
            OptionKind::Video
        } else {
            OptionKind::Extra
        }
    }
}

/// Read-only projection of a plan, sent to the modal.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PlanDetailPayload {
    pub slug: String,
    pub badge: Option<String>,
    pub subtitle: Option<String>,
    pub price: Option<String>,
    pub footnote: Option<String>,
    pub description: Option<String>,
    pub more_info_title: Option<String>,
    pub more_info_content: Option<String>,
    pub available_options: Option<Vec<String>>,
}

impl PlanDetailPayload {
    /// Payload for a slug with no configured plan: only the slug is known.
    pub fn bare(slug: &str) -> Self {
        Self {
            slug: slug.to_string(),
            ..Self::default()
        }
    }
}

impl From<&PlanConfig> for PlanDetailPayload {
    fn from(plan: &PlanConfig) -> Self {
        Self {
            slug: plan.slug.clone(),
            badge: plan.badge.clone(),
            subtitle: plan.subtitle.clone(),
            price: plan.price.clone(),
            footnote: plan.footnote.clone(),
            description: plan.description.clone(),
            more_info_title: plan.more_info_title.clone(),
            more_info_content: plan.more_info_content.clone(),
            available_options: plan.available_options.clone(),
        }
    }
}
