//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns from page and component
//! logic to improve reuse and testability.

pub mod auth;
pub mod dark_mode;
pub mod query;
pub mod storage;
pub mod upload;
