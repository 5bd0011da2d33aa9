//! Error taxonomy for API calls and session operations.
//!
//! ERROR HANDLING
//! ==============
//! `Validation` never reaches the network. `Authentication` is a 401 and has
//! already triggered the forced-logout side effect by the time a caller sees
//! it. `Domain` carries the server message verbatim. Nothing is retried.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use crate::util::storage::StorageError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("authentication required")]
    Authentication { message: Option<String> },
    #[error("request failed with status {status}")]
    Domain { status: u16, message: Option<String> },
    #[error("network error: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// Message supplied by the server in the error body, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Authentication { message } | Self::Domain { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Text to show the user: local validation text, the server message, or
    /// `fallback` for everything else.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            other => other.server_message().unwrap_or(fallback).to_owned(),
        }
    }

    #[must_use]
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }
}
