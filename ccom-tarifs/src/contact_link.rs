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

//! "Request a quote" link of the pricing section and its counterpart, the
//! contact form prefill.
//!
//! The pricing widget writes the active plan and the visual/video counts into
//! the query string of the contact link; the contact form reads them back to
//! preselect the formula and fill its number fields.

use url::{form_urlencoded, Url};

use crate::store::format_quantity;

/// Contact page used when the link declares no href.
pub const DEFAULT_CONTACT_HREF: &str = "/contact";

const FORMULA_PARAM: &str = "formula";
const VISUALS_PARAM: &str = "visuals";
const VIDEOS_PARAM: &str = "videos";

const FORMULA_ALIASES: &[&str] = &[FORMULA_PARAM, "plan"];
const VISUALS_ALIASES: &[&str] = &[VISUALS_PARAM, "visuels"];
const VIDEOS_ALIASES: &[&str] = &[VIDEOS_PARAM, "video", "vidéos"];

/// Origin used to resolve hrefs that are not absolute URLs.
const RESOLUTION_BASE: &str = "http://localhost/";

/// How the base href was written, so the result keeps the same shape.
enum HrefForm {
    Absolute,
    /// `//host/path`: keeps the page's scheme.
    SchemeRelative,
    Relative,
}

/// Rewrite `base_href` so that its query reflects the current selection.
///
/// `formula` is always set (removed for an empty slug); `visuals` and
/// `videos` are only present when positive. Other parameters, the path and
/// the fragment are kept. Relative and scheme-relative hrefs
/// keep their form.
pub fn compose_contact_href(base_href: &str, slug: &str, visuals: f64, videos: f64) -> String {
    let base_href = match base_href.trim() {
        "" => DEFAULT_CONTACT_HREF,
        href => href,
    };

    let (mut url, form) = match Url::parse(base_href) {
        Ok(url) => (url, HrefForm::Absolute),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let form = if base_href.starts_with("//") {
                HrefForm::SchemeRelative
            } else {
                HrefForm::Relative
            };
            match Url::parse(RESOLUTION_BASE).and_then(|origin| origin.join(base_href)) {
                Ok(url) => (url, form),
                Err(err) => {
                    log::warn!("cannot resolve contact href {base_href:?}: {err}");
                    return base_href.to_string();
                }
            }
        }
        Err(err) => {
            log::warn!("cannot parse contact href {base_href:?}: {err}");
            return base_href.to_string();
        }
    };

    let mut params = QueryParams::from_url(&url);
    if slug.is_empty() {
        params.delete(FORMULA_PARAM);
    } else {
        params.set(FORMULA_PARAM, slug);
    }
    params.set_count(VISUALS_PARAM, visuals);
    params.set_count(VIDEOS_PARAM, videos);

    let query = params.serialize();
    url.set_query(if query.is_empty() { None } else { Some(query.as_str()) });

    match form {
        HrefForm::Absolute => return url.to_string(),
        HrefForm::SchemeRelative => {
            let scheme = url.scheme().len() + 1;
            return url.as_str()[scheme..].to_string();
        }
        HrefForm::Relative => {}
    }

    let mut href = url.path().to_string();
    if let Some(query) = url.query() {
        href.push('?');
        href.push_str(query);
    }
    if let Some(fragment) = url.fragment() {
        href.push('#');
        href.push_str(fragment);
    }
    href
}

/// Ordered query parameters with `URLSearchParams`-like `set`/`delete`.
struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    fn from_url(url: &Url) -> Self {
        Self(url.query_pairs().into_owned().collect())
    }

    /// Replace the first occurrence in place and drop the others, or append.
    fn set(&mut self, name: &str, value: &str) {
        match self.0.iter().position(|(key, _)| key == name) {
            Some(first) => {
                self.0[first].1 = value.to_string();
                let mut index = 0;
                self.0.retain(|(key, _)| {
                    let keep = key != name || index == first;
                    index += 1;
                    keep
                });
            }
            None => self.0.push((name.to_string(), value.to_string())),
        }
    }

    fn set_count(&mut self, name: &str, count: f64) {
        if count > 0.0 {
            self.set(name, &format_quantity(count));
        } else {
            self.delete(name);
        }
    }

    fn delete(&mut self, name: &str) {
        self.0.retain(|(key, _)| key != name);
    }

    fn serialize(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish()
    }
}

/// Values the contact form reads from its own query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactPrefill {
    pub formula: Option<String>,
    pub visuals: Option<u32>,
    pub videos: Option<u32>,
}

impl ContactPrefill {
    /// Parse a query string, with or without the leading `?`.
    pub fn from_query(query: &str) -> Self {
        let pairs: Vec<(String, String)> =
            form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
                .into_owned()
                .collect();

        let first = |aliases: &[&str]| {
            aliases.iter().find_map(|alias| {
                pairs
                    .iter()
                    .find(|(key, value)| key == alias && !value.is_empty())
                    .map(|(_, value)| value.clone())
            })
        };
        let count = |aliases: &[&str]| {
            aliases.iter().find_map(|alias| {
                pairs
                    .iter()
                    .filter(|(key, _)| key == alias)
                    .find_map(|(_, value)| value.trim().parse::<u32>().ok())
            })
        };

        Self {
            formula: first(FORMULA_ALIASES),
            visuals: count(VISUALS_ALIASES),
            videos: count(VIDEOS_ALIASES),
        }
    }

    /// Parse the query part of an href such as `/contact?formula=cpro`.
    pub fn from_href(href: &str) -> Self {
        let without_fragment = href.split('#').next().unwrap_or_default();
        match without_fragment.split_once('?') {
            Some((_, query)) => Self::from_query(query),
            None => Self::default(),
        }
    }
}

/// Index of the formula matching `requested` (trimmed, case-insensitive),
/// falling back to the first formula. `None` only when there is no formula.
pub fn select_formula(formula_ids: &[&str], requested: Option<&str>) -> Option<usize> {
    if formula_ids.is_empty() {
        return None;
    }
    let wanted = requested.map(normalize).unwrap_or_default();
    formula_ids
        .iter()
        .position(|id| !wanted.is_empty() && normalize(id) == wanted)
        .or(Some(0))
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sets_formula_and_positive_counts_only() {
        let href = compose_contact_href("/contact", "cpro", 2.0, 0.0);
        assert_eq!(href, "/contact?formula=cpro&visuals=2");
    }

    #[test]
    fn preserves_unrelated_params_and_path() {
        let href = compose_contact_href("/devis/rapide?utm_source=site&videos=4", "csimple", 0.0, 1.0);
        assert_eq!(href, "/devis/rapide?utm_source=site&videos=1&formula=csimple");
    }

    #[test]
    fn removes_stale_counts() {
        let href = compose_contact_href("/contact?formula=cpro&visuals=3&videos=2", "cessentiel", 0.0, 0.0);
        assert_eq!(href, "/contact?formula=cessentiel");
    }

    #[test]
    fn empty_slug_removes_formula() {
        assert_eq!(compose_contact_href("/contact?formula=cpro", "", 0.0, 0.0), "/contact");
    }

    #[test]
    fn empty_base_uses_default_contact_page() {
        assert_eq!(compose_contact_href("  ", "cpro", 0.0, 0.0), "/contact?formula=cpro");
    }

    #[test]
    fn absolute_hrefs_stay_absolute() {
        let href = compose_contact_href("https://ccom.fr/contact#form", "cpro", 1.0, 2.0);
        assert_eq!(href, "https://ccom.fr/contact?formula=cpro&visuals=1&videos=2#form");
    }

    #[test]
    fn scheme_relative_hrefs_keep_their_host() {
        let href = compose_contact_href("//ccom.fr/contact?source=tarifs", "cpro", 0.0, 1.0);
        assert_eq!(href, "//ccom.fr/contact?source=tarifs&formula=cpro&videos=1");
        assert_eq!(compose_contact_href(&href, "cpro", 0.0, 1.0), href);
    }

    #[test]
    fn composing_twice_is_idempotent() {
        let once = compose_contact_href("/contact?ref=nav", "cpro", 2.0, 1.0);
        let twice = compose_contact_href(&once, "cpro", 2.0, 1.0);
        assert_eq!(once, twice);
    }

    #[test]
    fn prefill_reads_aliases() {
        let prefill = ContactPrefill::from_query("?plan=CPro&visuels=3&vid%C3%A9os=2");
        assert_eq!(prefill.formula.as_deref(), Some("CPro"));
        assert_eq!(prefill.visuals, Some(3));
        assert_eq!(prefill.videos, Some(2));
    }

    #[test]
    fn prefill_rejects_negative_and_garbage_counts() {
        let prefill = ContactPrefill::from_query("visuals=-1&videos=abc&video=4");
        assert_eq!(prefill.visuals, None);
        assert_eq!(prefill.videos, Some(4));
        assert_eq!(prefill.formula, None);
    }

    #[test]
    fn prefill_round_trips_composed_link() {
        let href = compose_contact_href("/contact", "cpro", 2.0, 1.0);
        let prefill = ContactPrefill::from_href(&href);
        assert_eq!(
            prefill,
            ContactPrefill {
                formula: Some("cpro".into()),
                visuals: Some(2),
                videos: Some(1),
            }
        );
    }

    #[test]
    fn formula_selection_is_case_insensitive_with_fallback() {
        let ids = ["csimple", "cessentiel", "cpro"];
        assert_eq!(select_formula(&ids, Some(" CPRO ")), Some(2));
        assert_eq!(select_formula(&ids, Some("unknown")), Some(0));
        assert_eq!(select_formula(&ids, None), Some(0));
        assert_eq!(select_formula(&[], Some("cpro")), None);
    }
}
