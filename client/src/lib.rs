//! # mindset-client
//!
//! Leptos + WASM frontend for the Mindset self-development tracker.
//!
//! This crate contains the credential store, the HTTP access layer that
//! injects bearer tokens and turns a 401 into a global logout, the session
//! controller, the route guard, and the pages for todos, memos, study and
//! workout records, and the community feed. The REST backend is external.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

#[cfg(test)]
mod test_support;

/// Browser entry point: install console hooks, then hydrate the SSR markup.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
