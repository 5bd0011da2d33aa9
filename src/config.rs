//! Host configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid PORT value `{0}`")]
    InvalidPort(String),
    #[error("leptos configuration: {0}")]
    Leptos(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostConfig {
    pub port: u16,
}

impl HostConfig {
    /// Build from the environment.
    ///
    /// Optional:
    /// - `PORT`: listen port, default 3000
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self { port: parse_port(std::env::var("PORT").ok().as_deref())? })
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), self.port)
    }
}

fn parse_port(raw: Option<&str>) -> Result<u16, ConfigError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(DEFAULT_PORT),
        Some(value) => value.parse().map_err(|_| ConfigError::InvalidPort(value.to_owned())),
    }
}
