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

//! Pricing widget engine of the C'Com website.
//!
//! Framework-agnostic: the host page feeds the server-rendered
//! [`TarifsConfig`] and the option card declarations into a
//! [`TarifsController`], forwards stepper and plan trigger interactions to it
//! and renders the views it returns. The plan detail modal listens to the
//! same [`TarifBus`].
//!
//! # Example
//!
//! ```
//! use ccom_tarifs::{OptionCard, TarifBus, TarifsController};
//!
//! let raw = r#"{
//!     "defaultPlan": "cessentiel",
//!     "baseOptionIds": ["visuel"],
//!     "videoOptionIds": ["video"],
//!     "plans": [{ "slug": "csimple" }, { "slug": "cessentiel" }, { "slug": "cpro" }]
//! }"#;
//!
//! let bus = TarifBus::new();
//! let mut guard = Default::default();
//! let cards = vec![OptionCard::new("visuel"), OptionCard::new("video")];
//! let mut tarifs = TarifsController::mount(&mut guard, Some(raw), cards, bus).unwrap();
//!
//! assert_eq!(tarifs.active_plan(), "csimple");
//! tarifs.increment("video");
//! assert_eq!(tarifs.active_plan(), "cpro");
//! assert_eq!(tarifs.contact_href(), "/contact?formula=cpro&videos=1");
//! ```

pub mod bus;
pub mod constraint;
pub mod contact_link;
pub mod controller;
pub mod error;
pub mod modal;
pub mod plan;
pub mod store;

pub use bus::{TarifBus, TarifEvent, TarifSubscription};
pub use ccom_types::{PlanConfig, PlanDetailPayload, TarifsConfig};
pub use constraint::{clamp_quantity, DeclaredConstraint, OptionConstraint};
pub use contact_link::{compose_contact_href, select_formula, ContactPrefill};
pub use controller::{MountGuard, OptionCard, TarifsController};
pub use error::ConfigError;
pub use modal::{FocusHost, ModalElements, ModalSettings, ModalView, TarifModal};
pub use plan::{plan_label, PlanCardView, PlanCatalog, PlanTriggerView};
pub use store::{OptionState, OptionStore, PriceDisplay, StepperView};
