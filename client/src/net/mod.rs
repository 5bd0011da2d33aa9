//! Networking modules for the remote REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `http` is the single access layer (token injection, 401 handling),
//! `api` maps endpoints onto it, `types` defines the wire schema, `events`
//! carries the forced-logout signal, and `error` is the shared taxonomy.

pub mod api;
pub mod error;
pub mod events;
pub mod http;
pub mod types;
