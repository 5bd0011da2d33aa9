//! Persistent credential store.
//!
//! SYSTEM CONTEXT
//! ==============
//! The bearer token and the cached profile live under the `token` and `user`
//! keys. Two writers touch them: the session controller and the HTTP layer's
//! 401 handler. Both go through this type so the pair is always written and
//! cleared together.
//!
//! TRADE-OFFS
//! ==========
//! Writes are plain synchronous sequences with no suspension point, which is
//! enough for atomicity on the single-threaded browser event loop.

#[cfg(test)]
#[path = "credentials_test.rs"]
mod credentials_test;

use std::rc::Rc;

use crate::net::types::UserProfile;
use crate::util::storage::{BrowserStorage, KeyValueStore, StorageError, load_json, save_json};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// A token and the profile it belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Clone)]
pub struct CredentialStore {
    backend: Rc<dyn KeyValueStore>,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore").finish_non_exhaustive()
    }
}

impl CredentialStore {
    pub fn new(backend: Rc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Store backed by `window.localStorage`.
    #[must_use]
    pub fn browser() -> Self {
        Self::new(Rc::new(BrowserStorage))
    }

    /// Write token and profile. If the second write fails the first is
    /// rolled back so the store never holds half a pair.
    ///
    /// # Errors
    ///
    /// Returns an error if either write is rejected.
    pub fn save(&self, token: &str, user: &UserProfile) -> Result<(), StorageError> {
        self.backend.set(TOKEN_KEY, token)?;
        if let Err(e) = save_json(self.backend.as_ref(), USER_KEY, user) {
            self.clear();
            return Err(e);
        }
        Ok(())
    }

    /// Read both entries. A missing key, a blank token or a profile that does
    /// not parse all count as absent.
    #[must_use]
    pub fn load(&self) -> Option<Credentials> {
        let token = self.backend.get(TOKEN_KEY).filter(|t| !t.trim().is_empty())?;
        let user = load_json::<UserProfile>(self.backend.as_ref(), USER_KEY)?;
        Some(Credentials { token, user })
    }

    /// Token to attach to outgoing requests, only when the full pair is valid.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.load().map(|c| c.token)
    }

    /// True when either key is present, including a half-written pair.
    #[must_use]
    pub fn has_any(&self) -> bool {
        self.backend.get(TOKEN_KEY).is_some() || self.backend.get(USER_KEY).is_some()
    }

    pub fn clear(&self) {
        self.backend.remove(TOKEN_KEY);
        self.backend.remove(USER_KEY);
    }
}
