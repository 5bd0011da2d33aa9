//! HTTP access layer.
//!
//! Every REST call goes through [`ApiClient`]. Request interception resolves
//! the URL against [`ApiConfig`], attaches the bearer token from the
//! credential store and picks the content type. Response interception turns
//! non-2xx statuses into [`ApiError`] and, on a 401 while credentials are
//! stored, performs the forced logout: clear storage, hard-redirect to
//! `/login`, publish [`AuthEvent::ForcedLogout`]. A 401 with nothing stored
//! still publishes [`AuthEvent::CredentialRejected`] so stale in-memory
//! sessions end too.
//!
//! Relative paths get the base URL and the bearer token. Absolute URLs go
//! out untouched and never carry the credential.
//!
//! The network and browser navigation sit behind the [`Transport`] and
//! [`Navigator`] traits. The browser implementations are gated behind
//! `hydrate`; on the server they fail or no-op.
//!
//! ERROR HANDLING
//! ==============
//! Calls are at-most-once. Transport failures and non-401 statuses go back
//! to the caller unchanged; nothing here retries.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::rc::Rc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::events::{AuthEvent, AuthEvents};
use super::types::{ErrorBody, FileUpload};
use crate::config::{ApiConfig, is_absolute_url};
use crate::state::credentials::CredentialStore;
use crate::util::query::append_query;

pub const LOGIN_PATH: &str = "/login";
pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data";

const STATUS_UNAUTHORIZED: u16 = 401;

// =============================================================================
// REQUESTS
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MultipartPart {
    Text { name: String, value: String },
    /// Serialized JSON sent as an `application/json` blob part.
    Json { name: String, value: String },
    File { name: String, file: FileUpload },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MultipartForm {
    parts: Vec<MultipartPart>,
}

impl MultipartForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.parts.push(MultipartPart::Text { name: name.to_owned(), value: value.to_owned() });
        self
    }

    /// Add `value` as a JSON part.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Decode` if `value` fails to serialize.
    pub fn json<T: Serialize>(mut self, name: &str, value: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_string(value).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.parts.push(MultipartPart::Json { name: name.to_owned(), value });
        Ok(self)
    }

    #[must_use]
    pub fn file(mut self, name: &str, file: FileUpload) -> Self {
        self.parts.push(MultipartPart::File { name: name.to_owned(), file });
        self
    }

    #[must_use]
    pub fn parts(&self) -> &[MultipartPart] {
        &self.parts
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RequestBody {
    #[default]
    Empty,
    /// Serialized JSON text.
    Json(String),
    Multipart(MultipartForm),
}

/// An outgoing call before interception.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    /// Relative to the API base, or an absolute `http(s)://` URL.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), query: Vec::new(), body: RequestBody::Empty }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// # Errors
    ///
    /// Returns `ApiError::Decode` if `body` fails to serialize.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, ApiError> {
        let raw = serde_json::to_string(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.body = RequestBody::Json(raw);
        Ok(self)
    }

    #[must_use]
    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    #[must_use]
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_owned(), value.to_string()));
        self
    }

    #[must_use]
    pub fn query_opt(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }
}

/// A request after interception, ready for a [`Transport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl PreparedRequest {
    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn is_multipart(&self) -> bool {
        matches!(self.body, RequestBody::Multipart(_))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// =============================================================================
// SEAMS
// =============================================================================

/// Sends a prepared request. Implementations report network failures as
/// `ApiError::Transport` and return every HTTP status as a response.
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse, ApiError>;
}

/// Full-page navigation, used for the forced-logout redirect.
pub trait Navigator {
    fn redirect(&self, path: &str);
}

/// `fetch` via gloo-net.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTransport;

#[async_trait(?Send)]
impl Transport for BrowserTransport {
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            browser::send(request).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = request;
            Err(ApiError::Transport("not available on server".to_owned()))
        }
    }
}

/// Sets `window.location.href`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn redirect(&self, path: &str) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(window) = web_sys::window() {
                let _ = window.location().set_href(path);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = path;
        }
    }
}

#[cfg(feature = "hydrate")]
mod browser {
    use gloo_net::http::{Method as GlooMethod, RequestBuilder};
    use wasm_bindgen::JsValue;

    use super::{ApiError, Method, MultipartForm, MultipartPart, PreparedRequest, RawResponse, RequestBody};

    fn js_error(err: JsValue) -> ApiError {
        ApiError::Transport(format!("{err:?}"))
    }

    fn blob(bytes: &[u8], mime: &str) -> Result<web_sys::Blob, ApiError> {
        let array = js_sys::Uint8Array::from(bytes);
        let parts = js_sys::Array::of1(&array);
        let options = web_sys::BlobPropertyBag::new();
        options.set_type(mime);
        web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(js_error)
    }

    fn form_data(form: &MultipartForm) -> Result<web_sys::FormData, ApiError> {
        let data = web_sys::FormData::new().map_err(js_error)?;
        for part in form.parts() {
            match part {
                MultipartPart::Text { name, value } => data.append_with_str(name, value),
                MultipartPart::Json { name, value } => data.append_with_blob(name, &blob(value.as_bytes(), super::JSON_CONTENT_TYPE)?),
                MultipartPart::File { name, file } => {
                    data.append_with_blob_and_filename(name, &blob(&file.bytes, &file.mime)?, &file.file_name)
                }
            }
            .map_err(js_error)?;
        }
        Ok(data)
    }

    pub(super) async fn send(request: PreparedRequest) -> Result<RawResponse, ApiError> {
        let method = match request.method {
            Method::Get => GlooMethod::GET,
            Method::Post => GlooMethod::POST,
            Method::Put => GlooMethod::PUT,
            Method::Delete => GlooMethod::DELETE,
        };
        let multipart = request.is_multipart();
        let mut builder = RequestBuilder::new(&request.url).method(method);
        for (name, value) in &request.headers {
            // The browser writes the multipart boundary itself.
            if multipart && name.eq_ignore_ascii_case("content-type") {
                continue;
            }
            builder = builder.header(name, value);
        }
        let built = match request.body {
            RequestBody::Empty => builder.build(),
            RequestBody::Json(raw) => builder.body(raw),
            RequestBody::Multipart(form) => builder.body(form_data(&form)?),
        }
        .map_err(|e| ApiError::Transport(e.to_string()))?;

        let resp = built.send().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        Ok(RawResponse { status, body })
    }
}

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    credentials: CredentialStore,
    transport: Rc<dyn Transport>,
    navigator: Rc<dyn Navigator>,
    events: AuthEvents,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient").field("config", &self.config).finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(
        config: ApiConfig,
        credentials: CredentialStore,
        transport: Rc<dyn Transport>,
        navigator: Rc<dyn Navigator>,
        events: AuthEvents,
    ) -> Self {
        Self { config, credentials, transport, navigator, events }
    }

    /// Client wired to `fetch`, `localStorage` and `window.location`.
    #[must_use]
    pub fn browser(config: ApiConfig) -> Self {
        Self::new(
            config,
            CredentialStore::browser(),
            Rc::new(BrowserTransport),
            Rc::new(BrowserNavigator),
            AuthEvents::new(),
        )
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    #[must_use]
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    #[must_use]
    pub fn events(&self) -> &AuthEvents {
        &self.events
    }

    /// Request interception. Never fails: a missing or unreadable credential
    /// just means no `Authorization` header. Absolute URLs are sent as given,
    /// without the token.
    #[must_use]
    pub fn prepare(&self, request: ApiRequest) -> PreparedRequest {
        let external = is_absolute_url(&request.path);
        let url = append_query(&self.config.resolve(&request.path), &request.query);
        let mut headers = Vec::with_capacity(2);
        let content_type = match request.body {
            RequestBody::Multipart(_) => MULTIPART_CONTENT_TYPE,
            RequestBody::Empty | RequestBody::Json(_) => JSON_CONTENT_TYPE,
        };
        headers.push(("Content-Type".to_owned(), content_type.to_owned()));
        if let Some(token) = self.credentials.token().filter(|_| !external) {
            headers.push(("Authorization".to_owned(), format!("Bearer {token}")));
        }
        PreparedRequest { method: request.method, url, headers, body: request.body }
    }

    /// Send with request and response interception.
    ///
    /// # Errors
    ///
    /// `Transport` when the request never completed, `Authentication` on
    /// 401 (after the forced logout ran), `Domain` for any other non-2xx.
    pub async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        let prepared = self.prepare(request);
        let method = prepared.method;
        let url = prepared.url.clone();
        let response = match self.transport.send(prepared).await {
            Ok(response) => response,
            Err(e) => {
                leptos::logging::warn!("{} {url} failed: {e}", method.as_str());
                return Err(e);
            }
        };
        if response.is_success() {
            return Ok(response);
        }
        leptos::logging::warn!("{} {url} returned {}", method.as_str(), response.status);
        Err(self.intercept_failure(&response))
    }

    /// Send and decode the JSON response body.
    ///
    /// # Errors
    ///
    /// Everything [`ApiClient::send`] returns, plus `Decode` when the body does
    /// not match `T`.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        decode(&response.body)
    }

    /// Send and discard the response body.
    ///
    /// # Errors
    ///
    /// Everything [`ApiClient::send`] returns.
    pub async fn send_empty(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.send(request).await.map(|_| ())
    }

    /// Clear stored credentials, redirect to the login page and notify
    /// subscribers. Returns `false` without side effects when nothing was
    /// stored, so repeated 401s log out once.
    pub fn force_logout(&self) -> bool {
        if !self.credentials.has_any() {
            return false;
        }
        self.credentials.clear();
        self.navigator.redirect(LOGIN_PATH);
        self.events.publish(AuthEvent::ForcedLogout);
        true
    }

    fn intercept_failure(&self, response: &RawResponse) -> ApiError {
        let message = ErrorBody::message_from(&response.body);
        if response.status == STATUS_UNAUTHORIZED {
            if self.force_logout() {
                leptos::logging::log!("credential rejected; signed out");
            } else {
                self.events.publish(AuthEvent::CredentialRejected);
            }
            return ApiError::Authentication { message };
        }
        ApiError::Domain { status: response.status, message }
    }
}

/// Decode a JSON body into `T`.
///
/// # Errors
///
/// Returns `ApiError::Decode` on malformed or mismatched JSON.
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}
