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

//! Pricing widget controller.
//!
//! One controller drives one pricing root. It owns the option store, the
//! active plan and the last payload sent to the modal, and reports every plan
//! change on the page's [`TarifBus`].

use ccom_types::tarifs::{OptionKind, TarifsConfig};
use ccom_types::PlanDetailPayload;

use crate::bus::{TarifBus, TarifEvent};
use crate::constraint::{DeclaredConstraint, OptionConstraint};
use crate::contact_link::{compose_contact_href, DEFAULT_CONTACT_HREF};
use crate::error::ConfigError;
use crate::plan::{PlanCardView, PlanCatalog, PlanTriggerView};
use crate::store::{OptionState, OptionStore, PriceDisplay};

/// Keys that activate a focused plan trigger.
const TRIGGER_KEYS: [&str; 2] = ["Enter", " "];

/// Option card as declared in the server-rendered markup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionCard {
    pub id: String,
    /// Declared type. `None` falls back to the configuration id lists.
    pub kind: Option<OptionKind>,
    pub declared: DeclaredConstraint,
    pub disabled: bool,
    pub counter_enabled: bool,
    pub pricing: PriceDisplay,
}

impl OptionCard {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            counter_enabled: true,
            ..Self::default()
        }
    }

    pub fn kind(mut self, kind: OptionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Declared type from the card's `data-option-type` attribute. Unknown
    /// values leave the type to the configuration id lists.
    pub fn type_attr(mut self, raw: &str) -> Self {
        self.kind = OptionKind::parse(raw);
        self
    }

    pub fn declared(mut self, declared: DeclaredConstraint) -> Self {
        self.declared = declared;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

/// "Already initialized" marker of a pricing root.
#[derive(Debug, Default)]
pub struct MountGuard {
    mounted: bool,
}

impl MountGuard {
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }
}

#[derive(Debug)]
pub struct TarifsController {
    config: TarifsConfig,
    catalog: PlanCatalog,
    store: OptionStore,
    active: String,
    last_detail: Option<PlanDetailPayload>,
    bus: TarifBus,
    contact_base: String,
}

impl TarifsController {
    /// Build the controller and apply the initial plan.
    ///
    /// Emits the first [`TarifEvent::PlanChange`] before returning.
    pub fn new(
        config: TarifsConfig,
        cards: Vec<OptionCard>,
        bus: TarifBus,
    ) -> Result<Self, ConfigError> {
        let catalog = PlanCatalog::new(config.plans.clone());
        if catalog.is_empty() {
            return Err(ConfigError::NoPlans);
        }

        let mut store = OptionStore::new();
        for card in cards {
            let constraint =
                OptionConstraint::resolve(&card.declared, config.option_constraints.get(&card.id));
            let quantity = config
                .option_quantities
                .get(&card.id)
                .copied()
                .unwrap_or(constraint.min);
            store.insert(OptionState {
                kind: card.kind.unwrap_or_else(|| config.kind_of(&card.id)),
                constraint,
                quantity,
                disabled: card.disabled,
                originally_disabled: card.disabled,
                counter_enabled: card.counter_enabled,
                pricing: card.pricing,
                id: card.id,
            });
        }

        let mut controller = Self {
            config,
            catalog,
            store,
            active: String::new(),
            last_detail: None,
            bus,
            contact_base: DEFAULT_CONTACT_HREF.to_string(),
        };
        let initial = controller.settle_plan();
        controller.announce(initial);
        Ok(controller)
    }

    /// Mount a pricing root from its raw configuration attribute.
    ///
    /// Returns `None` when the root is already mounted or the configuration
    /// cannot be used; the static markup then stays as rendered.
    pub fn mount(
        guard: &mut MountGuard,
        raw_config: Option<&str>,
        cards: Vec<OptionCard>,
        bus: TarifBus,
    ) -> Option<Self> {
        if guard.mounted {
            log::debug!("pricing root already mounted");
            return None;
        }

        let result = raw_config
            .filter(|raw| !raw.trim().is_empty())
            .ok_or(ConfigError::Missing)
            .and_then(|raw| Ok(TarifsConfig::from_json(raw)?))
            .and_then(|config| Self::new(config, cards, bus));

        match result {
            Ok(controller) => {
                guard.mounted = true;
                Some(controller)
            }
            Err(e) => {
                log::warn!("pricing widget not mounted: {e}");
                None
            }
        }
    }

    /// Base href of the "request a quote" link.
    pub fn with_contact_href(mut self, base: impl Into<String>) -> Self {
        self.contact_base = base.into();
        self
    }

    pub fn increment(&mut self, option_id: &str) -> bool {
        let changed = self.store.increment(option_id).is_some();
        self.after_user_change(changed)
    }

    pub fn decrement(&mut self, option_id: &str) -> bool {
        let changed = self.store.decrement(option_id).is_some();
        self.after_user_change(changed)
    }

    /// User-initiated change by an arbitrary delta. Returns whether the
    /// quantity moved.
    pub fn change_quantity(&mut self, option_id: &str, delta: f64) -> bool {
        let changed = self.store.change_quantity(option_id, delta).is_some();
        self.after_user_change(changed)
    }

    /// Manual plan selection. Unknown or empty slugs are ignored.
    pub fn select_plan(&mut self, slug: &str) -> bool {
        let slug = slug.trim();
        if slug.is_empty() || !self.catalog.contains(slug) {
            log::debug!("ignoring selection of unknown plan {slug:?}");
            return false;
        }
        self.apply_plan(slug.to_string());
        true
    }

    /// Keyboard activation of a plan trigger.
    pub fn handle_trigger_key(&mut self, slug: &str, key: &str) -> bool {
        TRIGGER_KEYS.contains(&key) && self.select_plan(slug)
    }

    /// Ask the modal to open with the last announced plan.
    pub fn request_more_info(&mut self) -> PlanDetailPayload {
        let detail = self
            .last_detail
            .clone()
            .unwrap_or_else(|| self.catalog.detail(&self.active));
        self.bus.emit(TarifEvent::ModalOpen(detail.clone()));
        detail
    }

    pub fn active_plan(&self) -> &str {
        &self.active
    }

    pub fn plan_card(&self) -> PlanCardView {
        PlanCardView::new(&self.catalog, &self.active)
    }

    pub fn plan_triggers(&self) -> Vec<PlanTriggerView> {
        self.catalog
            .iter()
            .map(|plan| PlanTriggerView {
                slug: plan.slug.clone(),
                active: plan.slug == self.active,
            })
            .collect()
    }

    pub fn option(&self, option_id: &str) -> Option<&OptionState> {
        self.store.get(option_id)
    }

    pub fn options(&self) -> impl Iterator<Item = &OptionState> {
        self.store.iter()
    }

    /// Remembered quantity of a disabled option.
    pub fn remembered(&self, option_id: &str) -> Option<f64> {
        self.store.remembered(option_id)
    }

    /// `(visuals, videos)` totals.
    pub fn totals(&self) -> (f64, f64) {
        (
            self.store.total(OptionKind::Base),
            self.store.total(OptionKind::Video),
        )
    }

    pub fn contact_href(&self) -> String {
        let (visuals, videos) = self.totals();
        compose_contact_href(&self.contact_base, &self.active, visuals, videos)
    }

    pub fn last_detail(&self) -> Option<&PlanDetailPayload> {
        self.last_detail.as_ref()
    }

    pub fn bus(&self) -> &TarifBus {
        &self.bus
    }

    fn after_user_change(&mut self, changed: bool) -> bool {
        if !changed {
            return false;
        }
        let settled = self.settle_plan();
        if settled != self.active {
            self.announce(settled);
        }
        true
    }

    /// Derive the plan and apply its permissions until the quantities they
    /// restore no longer change the derivation.
    ///
    /// Bounded by the catalog size; a configuration that keeps flipping
    /// settles on the last applied plan.
    fn settle_plan(&mut self) -> String {
        let mut current = self.active.clone();
        for _ in 0..self.catalog.iter().count() {
            let derived = self.derive_plan();
            if derived == current {
                break;
            }
            self.apply_availability(&derived);
            current = derived;
        }
        current
    }

    fn derive_plan(&self) -> String {
        let (visuals, videos) = self.totals();
        self.catalog
            .select(&self.config.default_plan, visuals, videos)
            .unwrap_or_default()
            .to_string()
    }

    fn apply_plan(&mut self, slug: String) {
        self.apply_availability(&slug);
        self.announce(slug);
    }

    fn apply_availability(&mut self, slug: &str) {
        let plan = self.catalog.get(slug);
        let restrictions: Vec<(String, bool)> = self
            .store
            .iter()
            .map(|option| {
                let restricted = plan.map_or(false, |p| !p.permits(&option.id));
                (option.id.clone(), restricted)
            })
            .collect();
        for (id, restricted) in restrictions {
            self.store.apply_availability(&id, restricted);
        }
    }

    fn announce(&mut self, slug: String) {
        log::debug!("active plan: {slug}");
        let detail = self.catalog.detail(&slug);
        self.active = slug;
        self.last_detail = Some(detail.clone());
        self.bus.emit(TarifEvent::PlanChange(detail));
    }
}
