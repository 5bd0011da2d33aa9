//! Route guard helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Protected routes apply identical gating: a neutral placeholder while the
//! session resolves, the page once authenticated, and a single history-
//! replacing redirect to `/login` once the session settles anonymous.
//!
//! The redirect runs from an effect, so it fires after the render that
//! observed the anonymous state rather than during it.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::cell::Cell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::net::http::LOGIN_PATH;
use crate::state::auth::{AuthState, SessionPhase};

/// Text shown in place of protected content while the session resolves.
pub const LOADING_PLACEHOLDER: &str = "Loading...";

/// What a guarded route should do for a given auth snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Placeholder,
    Render,
    Redirect,
}

#[must_use]
pub fn guard_decision(state: &AuthState) -> GuardDecision {
    match state.phase() {
        SessionPhase::Resolving => GuardDecision::Placeholder,
        SessionPhase::Authenticated => GuardDecision::Render,
        SessionPhase::Anonymous => GuardDecision::Redirect,
    }
}

/// True once auth has loaded and no user is present.
#[must_use]
pub fn should_redirect_unauth(state: &AuthState) -> bool {
    guard_decision(state) == GuardDecision::Redirect
}

/// Fires at most once until reset, so a guard redirects exactly once per
/// anonymous stretch even if the effect re-runs.
#[derive(Clone, Debug, Default)]
pub struct RedirectLatch {
    fired: Rc<Cell<bool>>,
}

impl RedirectLatch {
    /// Returns `true` only on the first call since the last reset.
    pub fn fire(&self) -> bool {
        !self.fired.replace(true)
    }

    pub fn reset(&self) {
        self.fired.set(false);
    }

    #[must_use]
    pub fn has_fired(&self) -> bool {
        self.fired.get()
    }
}

/// Apply the latch to a decision and report whether to navigate now.
pub fn redirect_due(latch: &RedirectLatch, decision: GuardDecision) -> bool {
    match decision {
        GuardDecision::Redirect => latch.fire(),
        GuardDecision::Render => {
            latch.reset();
            false
        }
        GuardDecision::Placeholder => false,
    }
}

/// Replace the current history entry with `/login` whenever auth has loaded
/// and no user is present.
pub fn install_unauth_redirect<F>(auth: RwSignal<AuthState>, navigate: F) -> RedirectLatch
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    let latch = RedirectLatch::default();
    let effect_latch = latch.clone();
    Effect::new(move || {
        let decision = guard_decision(&auth.get());
        if redirect_due(&effect_latch, decision) {
            navigate(LOGIN_PATH, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });
    latch
}
