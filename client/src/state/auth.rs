//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by route guards and user-aware components to coordinate login redirects
//! and identity-dependent rendering. The session controller is the only writer.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::{GetUntracked, RwSignal, Update};

use crate::net::types::UserProfile;

/// Where the session is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// Startup reconciliation has not finished.
    Resolving,
    Anonymous,
    Authenticated,
}

/// Authentication state tracking the current user and loading status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<UserProfile>,
    /// True only until startup reconciliation settles.
    pub loading: bool,
    /// Message from the last failed operation, cleared when the next starts.
    pub error: Option<String>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self { user: None, loading: true, error: None }
    }
}

impl AuthState {
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.loading {
            SessionPhase::Resolving
        } else if self.user.is_some() {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Anonymous
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn user_id(&self) -> Option<u64> {
        self.user.as_ref().map(|u| u.user_id)
    }
}

/// Somewhere an [`AuthState`] lives. The app keeps it in a signal so the view
/// tree reacts; tests keep it in a plain cell.
pub trait SessionCell: Clone + 'static {
    fn current(&self) -> AuthState;
    fn modify(&self, f: impl FnOnce(&mut AuthState));
}

impl SessionCell for RwSignal<AuthState> {
    fn current(&self) -> AuthState {
        self.get_untracked()
    }

    fn modify(&self, f: impl FnOnce(&mut AuthState)) {
        Update::update(self, f);
    }
}

impl SessionCell for Rc<RefCell<AuthState>> {
    fn current(&self) -> AuthState {
        self.borrow().clone()
    }

    fn modify(&self, f: impl FnOnce(&mut AuthState)) {
        f(&mut self.borrow_mut());
    }
}
