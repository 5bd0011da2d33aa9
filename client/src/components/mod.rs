//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read shared session state from Leptos context providers and
//! stay free of page-specific data loading.

pub mod markdown;
pub mod nav_bar;
pub mod require_auth;
