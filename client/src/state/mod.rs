//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! `credentials` is the persisted half of the session, `auth` the reactive
//! half, and `session` the controller that keeps the two in step.

pub mod auth;
pub mod credentials;
pub mod session;
