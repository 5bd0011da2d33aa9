//! Key-value persistence backends.
//!
//! SYSTEM CONTEXT
//! ==============
//! Browser `localStorage` is the durable store for credentials and display
//! preferences. `MemoryStorage` stands in for it in tests and anywhere a
//! browser is not available.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("storage is not available")]
    Unavailable,
    #[error("storage rejected write for `{key}`")]
    Rejected { key: String },
    #[error("failed to encode value: {0}")]
    Encode(String),
}

/// Synchronous string key-value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns an error if the backend is missing or refuses the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str);
}

/// `window.localStorage`. Reads return `None` and writes fail with
/// `Unavailable` outside the browser.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

#[cfg(feature = "hydrate")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            local_storage()?.get_item(key).ok().flatten()
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            None
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        #[cfg(feature = "hydrate")]
        {
            let storage = local_storage().ok_or(StorageError::Unavailable)?;
            storage
                .set_item(key, value)
                .map_err(|_| StorageError::Rejected { key: key.to_owned() })
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (key, value);
            Err(StorageError::Unavailable)
        }
    }

    fn remove(&self, key: &str) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(storage) = local_storage() {
                let _ = storage.remove_item(key);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
        }
    }
}

/// In-process store. Clones share the same entries.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// Load a JSON value stored under `key`. Missing or malformed entries read as `None`.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    serde_json::from_str(&raw).ok()
}

/// Save a JSON value under `key`.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized or the write fails.
pub fn save_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|e| StorageError::Encode(e.to_string()))?;
    store.set(key, &raw)
}
