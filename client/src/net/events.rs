//! Authentication event hub.
//!
//! SYSTEM CONTEXT
//! ==============
//! The HTTP layer clears credentials and redirects on a 401 without holding
//! a reference to the session controller. It announces that here; the
//! controller (and anything else) listens. Subscriptions end when their
//! guard is dropped.

#[cfg(test)]
#[path = "events_test.rs"]
mod events_test;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthEvent {
    /// The server rejected the stored credential; storage is already cleared.
    ForcedLogout,
    /// A 401 arrived while storage held no credential, e.g. another tab
    /// signed out. Anyone still holding an in-memory identity drops it.
    CredentialRejected,
}

type Listener = Rc<dyn Fn(AuthEvent)>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

#[derive(Clone, Default)]
pub struct AuthEvents {
    registry: Rc<RefCell<Registry>>,
}

impl std::fmt::Debug for AuthEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthEvents").field("listeners", &self.listener_count()).finish()
    }
}

impl AuthEvents {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` until the returned guard is dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, listener: impl Fn(AuthEvent) + 'static) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Rc::new(listener)));
        Subscription { id, registry: Rc::downgrade(&self.registry) }
    }

    /// Deliver `event` to every current listener. Listeners may subscribe or
    /// unsubscribe while being notified.
    pub fn publish(&self, event: AuthEvent) {
        let listeners: Vec<Listener> = self.registry.borrow().listeners.iter().map(|(_, l)| l.clone()).collect();
        for listener in listeners {
            listener(event);
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }
}

/// Keeps a listener registered. Unsubscribes on drop.
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().listeners.retain(|(id, _)| *id != self.id);
        }
    }
}
