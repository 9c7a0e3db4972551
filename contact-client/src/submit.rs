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

//! Submit-button bookkeeping shared by the contact and callback forms.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Whether a form's submit button is currently disabled.
///
/// Clones share the same flag, so the view and the submit task can each
/// hold one.
#[derive(Debug, Clone, Default)]
pub struct SubmitState {
    submitting: Arc<AtomicBool>,
}

impl SubmitState {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` while a submission is in flight; the button is disabled.
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Disable the button for the duration of one submission.
    ///
    /// Returns `None` when another submission already holds it. The button
    /// is re-enabled when the returned guard is dropped.
    pub fn begin(&self) -> Option<SubmitGuard> {
        self.submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmitGuard {
                submitting: self.submitting.clone(),
            })
    }
}

/// Keeps the submit button disabled until dropped.
#[derive(Debug)]
#[must_use = "the button is re-enabled as soon as the guard is dropped"]
pub struct SubmitGuard {
    submitting: Arc<AtomicBool>,
}

impl Drop for SubmitGuard {
    fn drop(&mut self) {
        self.submitting.store(false, Ordering::Release);
    }
}
