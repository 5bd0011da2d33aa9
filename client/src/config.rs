//! API endpoint configuration resolved at build time.
//!
//! The WASM bundle has no process environment at runtime, so the remote
//! origin and path prefix are baked in from `MINDSET_API_HOST` and
//! `MINDSET_API_BASE_PATH` when the crate is compiled. Both are optional.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_API_HOST: &str = "http://localhost:8080";
pub const DEFAULT_API_BASE_PATH: &str = "/api";

/// Remote REST API location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    /// Origin of the remote API, without a trailing slash.
    pub api_host: String,
    /// Path prefix prepended to every relative request path. Empty when the
    /// API is mounted at the origin root.
    pub api_base_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_values(None, None)
    }
}

impl ApiConfig {
    /// Build config from the compile-time environment.
    ///
    /// Optional:
    /// - `MINDSET_API_HOST`: default `http://localhost:8080`
    /// - `MINDSET_API_BASE_PATH`: default `/api`
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_values(option_env!("MINDSET_API_HOST"), option_env!("MINDSET_API_BASE_PATH"))
    }

    /// Normalize raw option values, falling back to defaults for blanks.
    #[must_use]
    pub fn from_values(api_host: Option<&str>, api_base_path: Option<&str>) -> Self {
        let api_host = non_blank(api_host)
            .unwrap_or(DEFAULT_API_HOST)
            .trim_end_matches('/')
            .to_owned();
        let api_base_path = normalize_base_path(non_blank(api_base_path).unwrap_or(DEFAULT_API_BASE_PATH));
        Self { api_host, api_base_path }
    }

    /// Origin plus path prefix, e.g. `http://localhost:8080/api`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("{}{}", self.api_host, self.api_base_path)
    }

    /// Resolve a request path against the base URL. Absolute URLs pass
    /// through untouched.
    #[must_use]
    pub fn resolve(&self, path: &str) -> String {
        if is_absolute_url(path) {
            return path.to_owned();
        }
        if path.starts_with('/') {
            format!("{}{path}", self.base_url())
        } else {
            format!("{}/{path}", self.base_url())
        }
    }

    /// Authorization entry point for Kakao social login.
    #[must_use]
    pub fn kakao_login_url(&self) -> String {
        self.resolve("/oauth2/authorization/kakao")
    }

    /// Authorization entry point for Naver social login.
    #[must_use]
    pub fn naver_login_url(&self) -> String {
        self.resolve("/oauth2/authorization/naver")
    }
}

/// True for `http://` and `https://` URLs (case-insensitive scheme).
#[must_use]
pub fn is_absolute_url(path: &str) -> bool {
    let lower = path.get(..8).unwrap_or(path).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|v| !v.is_empty())
}

fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
