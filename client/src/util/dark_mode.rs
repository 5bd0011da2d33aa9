//! Dark mode initialization and toggle.
//!
//! Reads the user's preference from `localStorage` (`darkMode`, a JSON
//! boolean) and toggles a `dark` class on `<body>`. Toggle writes back to
//! storage and updates that class.
//!
//! TRADE-OFFS
//! ==========
//! Preference persistence is best-effort browser-only behavior; SSR paths
//! safely no-op to keep server rendering deterministic.

#[cfg(test)]
#[path = "dark_mode_test.rs"]
mod dark_mode_test;

use super::storage::{BrowserStorage, KeyValueStore, load_json, save_json};

pub const STORAGE_KEY: &str = "darkMode";
const BODY_CLASS: &str = "dark";

/// The stored preference, if the user ever chose one.
pub fn stored_preference(store: &dyn KeyValueStore) -> Option<bool> {
    load_json(store, STORAGE_KEY)
}

/// Read the dark mode preference.
///
/// Returns the stored choice, or whether the system prefers dark mode when
/// nothing is stored.
pub fn read_preference() -> bool {
    stored_preference(&BrowserStorage).unwrap_or_else(system_prefers_dark)
}

fn system_prefers_dark() -> bool {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window()
            .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
            .map_or(false, |mq| mq.matches())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        false
    }
}

/// Add or remove the `dark` class on `<body>`.
pub fn apply(enabled: bool) {
    #[cfg(feature = "hydrate")]
    {
        if let Some(body) = web_sys::window().and_then(|w| w.document()).and_then(|d| d.body()) {
            let classes = body.class_list();
            let _ = if enabled { classes.add_1(BODY_CLASS) } else { classes.remove_1(BODY_CLASS) };
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (enabled, BODY_CLASS);
    }
}

/// Flip `current`, persist the result into `store`, and return it.
pub fn toggle_in(store: &dyn KeyValueStore, current: bool) -> bool {
    let next = !current;
    if let Err(e) = save_json(store, STORAGE_KEY, &next) {
        leptos::logging::warn!("dark mode preference not saved: {e}");
    }
    next
}

/// Toggle dark mode and persist the new preference to localStorage.
pub fn toggle(current: bool) -> bool {
    let next = toggle_in(&BrowserStorage, current);
    apply(next);
    next
}
