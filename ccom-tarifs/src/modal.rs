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

//! Plan detail modal.
//!
//! The modal listens to the [`TarifBus`]: a plan change refreshes its cached
//! content without opening it, an open request renders the carried payload
//! and opens it. Focus handling goes through a [`FocusHost`] so the modal can
//! run against the browser DOM or a test double.

use std::collections::HashMap;

use ccom_types::{PlanDetailPayload, TarifsConfig};

use crate::bus::{TarifBus, TarifEvent, TarifSubscription};

/// Body rendered when the plan has no additional information.
pub const EMPTY_PLAN_CONTENT: &str = "<p>Aucune information complémentaire pour le moment.</p>";

/// Key that closes an open modal.
pub const ESCAPE_KEY: &str = "Escape";

/// Access to the document focus.
pub trait FocusHost {
    type Element: Clone + PartialEq;

    /// Element currently holding focus, if any.
    fn active_element(&self) -> Option<Self::Element>;

    /// Move focus to `element` without scrolling.
    fn focus(&mut self, element: &Self::Element);
}

/// Elements of the modal that take part in focus and click handling.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalElements<E> {
    /// Backdrop and container. A click on it, not on a descendant, closes.
    pub root: E,
    pub close_button: Option<E>,
    pub icon: Option<E>,
}

impl<E> ModalElements<E> {
    /// Close button, else icon, else root.
    fn focus_target(&self) -> &E {
        self.close_button
            .as_ref()
            .or(self.icon.as_ref())
            .unwrap_or(&self.root)
    }
}

/// Static modal content, rendered by the server next to the pricing section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModalSettings {
    pub fallback_title: String,
    /// Body used when a plan has no content; [`EMPTY_PLAN_CONTENT`] otherwise.
    pub fallback_content: Option<String>,
    pub default_plan: Option<String>,
    pub default_badge: Option<String>,
    pub initial_content: Option<String>,
    /// Icon markup per plan slug.
    pub plan_icons: HashMap<String, String>,
}

impl ModalSettings {
    /// Settings derived from the pricing configuration.
    pub fn from_config(config: &TarifsConfig) -> Self {
        let modal = config.modal.clone().unwrap_or_default();
        let default_plan = config.plan(&config.default_plan);
        Self {
            fallback_title: modal.title.unwrap_or_default(),
            fallback_content: modal.content.filter(|c| !c.trim().is_empty()),
            default_plan: default_plan.map(|p| p.slug.clone()),
            default_badge: default_plan.and_then(|p| p.badge.clone()),
            initial_content: default_plan.and_then(|p| p.more_info_content.clone()),
            plan_icons: config
                .plans
                .iter()
                .filter_map(|p| Some((p.slug.clone(), p.icon.clone()?)))
                .collect(),
        }
    }

    fn seed_detail(&self) -> Option<PlanDetailPayload> {
        let slug = self.default_plan.as_deref().filter(|s| !s.is_empty())?;
        Some(PlanDetailPayload {
            badge: self.default_badge.clone().filter(|b| !b.is_empty()),
            more_info_content: self.initial_content.clone().filter(|c| !c.is_empty()),
            ..PlanDetailPayload::bare(slug)
        })
    }
}

/// Icon area of the modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalIcon {
    /// Copy of the plan's icon.
    Plan { slug: String, markup: String },
    /// Text fallback: badge, slug or fallback title.
    Text(String),
}

/// Rendered modal content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalView {
    pub title: String,
    pub body_html: String,
    pub icon: ModalIcon,
    /// Slug of the rendered plan, exposed as `data-plan` on the icon.
    pub plan: Option<String>,
}

/// State machine of the plan detail modal.
pub struct TarifModal<E> {
    elements: ModalElements<E>,
    settings: ModalSettings,
    subscription: TarifSubscription,
    open: bool,
    last_detail: Option<PlanDetailPayload>,
    last_focused: Option<E>,
    view: ModalView,
}

impl<E: Clone + PartialEq> TarifModal<E> {
    pub fn new(elements: ModalElements<E>, settings: ModalSettings, bus: &TarifBus) -> Self {
        let last_detail = settings.seed_detail();
        let view = render(&settings, last_detail.as_ref());
        Self {
            elements,
            settings,
            subscription: bus.subscribe(),
            open: false,
            last_detail,
            last_focused: None,
            view,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Value of the root's `aria-hidden` attribute.
    pub fn aria_hidden(&self) -> &'static str {
        if self.open {
            "false"
        } else {
            "true"
        }
    }

    pub fn view(&self) -> &ModalView {
        &self.view
    }

    pub fn last_detail(&self) -> Option<&PlanDetailPayload> {
        self.last_detail.as_ref()
    }

    /// Handle every pending bus event. Returns how many were handled.
    pub fn pump<H>(&mut self, host: &mut H) -> usize
    where
        H: FocusHost<Element = E>,
    {
        let events = self.subscription.drain();
        let handled = events.len();
        for event in events {
            self.handle_event(event, host);
        }
        handled
    }

    pub fn handle_event<H>(&mut self, event: TarifEvent, host: &mut H)
    where
        H: FocusHost<Element = E>,
    {
        match event {
            TarifEvent::PlanChange(detail) => {
                self.last_detail = Some(detail);
                self.rerender();
            }
            TarifEvent::ModalOpen(detail) => self.open(Some(detail), host),
        }
    }

    /// Render `detail` (or the cached payload) and open the modal.
    ///
    /// The element focused before opening is restored by [`Self::close`].
    pub fn open<H>(&mut self, detail: Option<PlanDetailPayload>, host: &mut H)
    where
        H: FocusHost<Element = E>,
    {
        if let Some(detail) = detail {
            self.last_detail = Some(detail);
        }
        self.rerender();

        if !self.open {
            self.last_focused = host.active_element();
            self.open = true;
        }
        host.focus(self.elements.focus_target());
    }

    pub fn close<H>(&mut self, host: &mut H)
    where
        H: FocusHost<Element = E>,
    {
        self.open = false;
        if let Some(previous) = self.last_focused.take() {
            host.focus(&previous);
        }
    }

    /// Keyboard handler. Returns `true` when the key was consumed.
    pub fn handle_key<H>(&mut self, key: &str, host: &mut H) -> bool
    where
        H: FocusHost<Element = E>,
    {
        if self.open && key == ESCAPE_KEY {
            self.close(host);
            return true;
        }
        false
    }

    /// Click handler. Only a click whose target is the root itself closes.
    pub fn handle_click<H>(&mut self, target: &E, host: &mut H) -> bool
    where
        H: FocusHost<Element = E>,
    {
        if self.open && *target == self.elements.root {
            self.close(host);
            return true;
        }
        false
    }

    fn rerender(&mut self) {
        self.view = render(&self.settings, self.last_detail.as_ref());
    }
}

fn render(settings: &ModalSettings, detail: Option<&PlanDetailPayload>) -> ModalView {
    let title = detail
        .and_then(|d| d.more_info_title.clone())
        .unwrap_or_else(|| settings.fallback_title.clone());

    let body_html = match detail.and_then(|d| d.more_info_content.as_deref()) {
        Some(content) if !content.trim().is_empty() => content.to_string(),
        _ => settings
            .fallback_content
            .clone()
            .unwrap_or_else(|| EMPTY_PLAN_CONTENT.to_string()),
    };

    let plan = detail.map(|d| d.slug.clone()).filter(|s| !s.is_empty());

    let icon = match plan.as_ref().and_then(|slug| Some((slug, settings.plan_icons.get(slug)?))) {
        Some((slug, markup)) => ModalIcon::Plan {
            slug: slug.clone(),
            markup: markup.clone(),
        },
        None => {
            let text = [
                detail.and_then(|d| d.badge.as_deref()),
                plan.as_deref(),
                Some(settings.fallback_title.as_str()),
            ]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .unwrap_or_default();
            ModalIcon::Text(text.to_string())
        }
    };

    ModalView {
        title,
        body_html,
        icon,
        plan,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Focus double recording every focus move.
    #[derive(Default)]
    struct Page {
        active: Option<&'static str>,
        moves: Vec<&'static str>,
    }

    impl FocusHost for Page {
        type Element = &'static str;

        fn active_element(&self) -> Option<&'static str> {
            self.active
        }

        fn focus(&mut self, element: &&'static str) {
            self.active = Some(*element);
            self.moves.push(*element);
        }
    }

    fn elements() -> ModalElements<&'static str> {
        ModalElements {
            root: "modal",
            close_button: Some("close"),
            icon: Some("icon"),
        }
    }

    fn settings() -> ModalSettings {
        ModalSettings {
            fallback_title: "Nos formules".into(),
            ..ModalSettings::default()
        }
    }

    fn detail(slug: &str) -> PlanDetailPayload {
        PlanDetailPayload {
            more_info_title: Some(format!("Formule {slug}")),
            more_info_content: Some(format!("<p>{slug}</p>")),
            ..PlanDetailPayload::bare(slug)
        }
    }

    #[test]
    fn opening_focuses_close_button_and_closing_restores_focus() {
        let bus = TarifBus::new();
        let mut modal = TarifModal::new(elements(), settings(), &bus);
        let mut page = Page {
            active: Some("more-info-button"),
            ..Page::default()
        };

        modal.open(Some(detail("cpro")), &mut page);
        assert!(modal.is_open());
        assert_eq!(modal.aria_hidden(), "false");
        assert_eq!(page.active, Some("close"));

        modal.close(&mut page);
        assert!(!modal.is_open());
        assert_eq!(page.active, Some("more-info-button"));
    }

    #[test]
    fn focus_falls_back_to_icon_then_root() {
        let bus = TarifBus::new();
        let mut page = Page::default();

        let mut no_close = elements();
        no_close.close_button = None;
        let mut modal = TarifModal::new(no_close, settings(), &bus);
        modal.open(None, &mut page);
        assert_eq!(page.active, Some("icon"));

        let bare = ModalElements {
            root: "modal",
            close_button: None,
            icon: None,
        };
        let mut modal = TarifModal::new(bare, settings(), &bus);
        modal.open(None, &mut page);
        assert_eq!(page.active, Some("modal"));
    }

    #[test]
    fn reopening_keeps_the_original_focus_to_restore() {
        let bus = TarifBus::new();
        let mut modal = TarifModal::new(elements(), settings(), &bus);
        let mut page = Page {
            active: Some("trigger"),
            ..Page::default()
        };

        modal.open(Some(detail("cpro")), &mut page);
        modal.open(Some(detail("csimple")), &mut page);
        modal.close(&mut page);
        assert_eq!(page.active, Some("trigger"));
    }

    #[test]
    fn escape_closes_only_when_open() {
        let bus = TarifBus::new();
        let mut modal = TarifModal::new(elements(), settings(), &bus);
        let mut page = Page::default();

        assert!(!modal.handle_key(ESCAPE_KEY, &mut page));
        modal.open(None, &mut page);
        assert!(!modal.handle_key("Enter", &mut page));
        assert!(modal.is_open());
        assert!(modal.handle_key(ESCAPE_KEY, &mut page));
        assert!(!modal.is_open());
    }

    #[test]
    fn backdrop_click_closes_but_content_click_does_not() {
        let bus = TarifBus::new();
        let mut modal = TarifModal::new(elements(), settings(), &bus);
        let mut page = Page::default();
        modal.open(None, &mut page);

        assert!(!modal.handle_click(&"modal-body", &mut page));
        assert!(modal.is_open());
        assert!(modal.handle_click(&"modal", &mut page));
        assert!(!modal.is_open());
    }

    #[test]
    fn plan_change_updates_content_without_opening() {
        let bus = TarifBus::new();
        let mut modal = TarifModal::new(elements(), settings(), &bus);
        let mut page = Page::default();

        bus.emit(TarifEvent::PlanChange(detail("cpro")));
        assert_eq!(modal.pump(&mut page), 1);
        assert!(!modal.is_open());
        assert_eq!(modal.view().title, "Formule cpro");
        assert!(page.moves.is_empty());

        bus.emit(TarifEvent::ModalOpen(detail("csimple")));
        modal.pump(&mut page);
        assert!(modal.is_open());
        assert_eq!(modal.view().body_html, "<p>csimple</p>");
    }

    #[test]
    fn empty_content_renders_fallback_body() {
        let bus = TarifBus::new();
        let mut modal = TarifModal::new(elements(), settings(), &bus);
        let mut page = Page::default();

        let mut blank = detail("cessentiel");
        blank.more_info_title = None;
        blank.more_info_content = Some("   ".into());
        modal.open(Some(blank), &mut page);

        assert_eq!(modal.view().title, "Nos formules");
        assert_eq!(modal.view().body_html, EMPTY_PLAN_CONTENT);
    }

    #[test]
    fn icon_uses_plan_markup_then_text_fallbacks() {
        let bus = TarifBus::new();
        let mut with_icons = settings();
        with_icons
            .plan_icons
            .insert("cpro".into(), "<svg data-icon=\"pro\"/>".into());
        let mut modal = TarifModal::new(elements(), with_icons, &bus);
        let mut page = Page::default();

        modal.open(Some(detail("cpro")), &mut page);
        assert_eq!(
            modal.view().icon,
            ModalIcon::Plan {
                slug: "cpro".into(),
                markup: "<svg data-icon=\"pro\"/>".into()
            }
        );

        let mut badged = detail("csimple");
        badged.badge = Some("Découverte".into());
        modal.open(Some(badged), &mut page);
        assert_eq!(modal.view().icon, ModalIcon::Text("Découverte".into()));

        modal.open(Some(detail("cessentiel")), &mut page);
        assert_eq!(modal.view().icon, ModalIcon::Text("cessentiel".into()));
    }

    #[test]
    fn seeded_default_plan_is_rendered_before_any_event() {
        let bus = TarifBus::new();
        let seeded = ModalSettings {
            default_plan: Some("cessentiel".into()),
            default_badge: Some("Populaire".into()),
            initial_content: Some("<p>Essentiel</p>".into()),
            ..settings()
        };
        let modal = TarifModal::new(elements(), seeded, &bus);
        assert_eq!(modal.view().plan.as_deref(), Some("cessentiel"));
        assert_eq!(modal.view().body_html, "<p>Essentiel</p>");
        assert_eq!(modal.view().icon, ModalIcon::Text("Populaire".into()));
    }
}
