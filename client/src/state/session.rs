//! Session controller: the single writer of [`AuthState`].
//!
//! ARCHITECTURE
//! ============
//! One controller is built per running app and handed to the view tree via
//! context. It owns the identity transitions
//! (`Resolving -> Anonymous | Authenticated`, login, logout, profile edits)
//! and writes credentials through to storage before touching in-memory
//! state, so a reload always reconstructs what the UI shows.
//!
//! Forced logouts originate in the HTTP layer, which clears storage on its
//! own; the controller only mirrors them through an [`AuthEvents`]
//! subscription that ends when the last clone is dropped. A 401 that finds
//! storage already empty (another tab signed out) also drops the in-memory
//! user, and the route guard takes it from there.
//!
//! TRADE-OFFS
//! ==========
//! Operations are not queued. Concurrent profile updates resolve
//! last-response-wins. Identity changes bump an epoch so a slow startup
//! verification cannot resurrect a session the user already left.
//!
//! [`AuthEvents`]: crate::net::events::AuthEvents

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::Cell;
use std::rc::Rc;

use leptos::prelude::{LocalStorage, RwSignal, StoredValue, expect_context};

use super::auth::{AuthState, SessionCell};
use crate::net::api;
use crate::net::error::ApiError;
use crate::net::events::{AuthEvent, Subscription};
use crate::net::http::ApiClient;
use crate::net::types::{FileUpload, LoginRequest, OAuthCallbackParams, ProfileUpdate, SignupRequest, UserProfile};

const LOGIN_FAILED: &str = "Login failed. Check your email and password.";
const SIGNUP_FAILED: &str = "Sign-up failed. Please try again.";
const UPDATE_FAILED: &str = "Could not update your profile.";
const DELETE_FAILED: &str = "Could not delete your account.";
const OAUTH_FAILED: &str = "Social sign-in failed.";

/// Controller bound to the app's reactive auth signal.
pub type Session = SessionController<RwSignal<AuthState>>;

/// Context handle. The controller holds `Rc`s, so it lives in local storage;
/// the handle itself is `Copy` and can be captured by view closures.
pub type SessionContext = StoredValue<Session, LocalStorage>;

/// Fetch the session handle provided by `App`. Call `get_value()` at the
/// point of use.
pub fn use_session() -> SessionContext {
    expect_context::<SessionContext>()
}

/// Fetch the reactive auth state provided by `App`.
pub fn use_auth() -> RwSignal<AuthState> {
    expect_context::<RwSignal<AuthState>>()
}

/// Profile edit payload. Attaching an image switches the request to multipart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProfileChange {
    Fields(ProfileUpdate),
    WithImage { fields: ProfileUpdate, image: FileUpload },
}

#[derive(Clone)]
pub struct SessionController<C: SessionCell> {
    api: Rc<ApiClient>,
    state: C,
    epoch: Rc<Cell<u64>>,
    _forced_logout: Rc<Subscription>,
}

impl<C: SessionCell> std::fmt::Debug for SessionController<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("state", &self.state.current())
            .field("epoch", &self.epoch.get())
            .finish_non_exhaustive()
    }
}

impl<C: SessionCell> SessionController<C> {
    pub fn new(api: Rc<ApiClient>, state: C) -> Self {
        let epoch = Rc::new(Cell::new(0));
        let subscription = {
            let state = state.clone();
            let epoch = epoch.clone();
            api.events().subscribe(move |event| {
                // Rejections with nothing stored only matter to a tab that
                // still shows a user.
                if event == AuthEvent::CredentialRejected && state.current().user.is_none() {
                    return;
                }
                epoch.set(epoch.get() + 1);
                state.modify(|s| {
                    s.user = None;
                    s.loading = false;
                });
            })
        };
        Self { api, state, epoch, _forced_logout: Rc::new(subscription) }
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub fn state(&self) -> &C {
        &self.state
    }

    #[must_use]
    pub fn snapshot(&self) -> AuthState {
        self.state.current()
    }

    /// Startup reconciliation. Restores the cached profile immediately, then
    /// refreshes it from `GET /users/me`. Any verification failure signs the
    /// user out; the cached session is not kept.
    pub async fn init(&self) {
        let Some(cached) = self.api.credentials().load() else {
            // Drop half-written leftovers so storage matches the anonymous state.
            self.api.credentials().clear();
            self.state.modify(|s| {
                s.user = None;
                s.loading = false;
            });
            return;
        };

        let epoch = self.epoch.get();
        self.state.modify(|s| {
            s.user = Some(cached.user.clone());
            s.loading = false;
        });

        match api::fetch_me(&self.api).await {
            Ok(profile) => {
                if self.epoch.get() != epoch {
                    return;
                }
                if let Err(e) = self.api.credentials().save(&cached.token, &profile) {
                    leptos::logging::warn!("could not persist refreshed profile: {e}");
                }
                self.state.modify(|s| s.user = Some(profile));
            }
            Err(e) => {
                leptos::logging::warn!("session verification failed: {e}");
                if self.epoch.get() == epoch {
                    self.logout();
                }
            }
        }
    }

    /// Exchange email and password for a session.
    ///
    /// # Errors
    ///
    /// `Validation` before any request when a field is missing; otherwise the
    /// HTTP layer error. The user-facing text is also stored in `state.error`.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, ApiError> {
        self.begin();
        let result = async {
            let request = LoginRequest::new(email, password)?;
            let response = api::login(&self.api, &request).await?;
            self.establish(&response.token, response.user)
        }
        .await;
        self.settle(result, LOGIN_FAILED)
    }

    /// Register an account. Never signs in: the caller sends the user to the
    /// login page afterwards.
    ///
    /// # Errors
    ///
    /// `Validation` for missing credentials; otherwise the HTTP layer error.
    pub async fn signup(&self, request: &SignupRequest) -> Result<Option<UserProfile>, ApiError> {
        self.begin();
        let result = async {
            request.validate()?;
            api::signup(&self.api, request).await
        }
        .await;
        self.settle(result, SIGNUP_FAILED)
    }

    /// Local sign-out. Clears storage and state; the server is not contacted.
    pub fn logout(&self) {
        self.api.credentials().clear();
        self.bump_epoch();
        self.state.modify(|s| {
            s.user = None;
            s.loading = false;
            s.error = None;
        });
    }

    /// Save profile edits and adopt the server's canonical profile.
    ///
    /// # Errors
    ///
    /// The HTTP layer error; state is left untouched apart from `error`.
    pub async fn update_profile(&self, change: ProfileChange) -> Result<UserProfile, ApiError> {
        self.begin();
        let result = async {
            let profile = match &change {
                ProfileChange::Fields(fields) => api::update_me(&self.api, fields).await?,
                ProfileChange::WithImage { fields, image } => api::update_me_multipart(&self.api, fields, image).await?,
            };
            // A forced logout may have landed while the request was in flight.
            if let Some(current) = self.api.credentials().load() {
                self.api.credentials().save(&current.token, &profile)?;
                self.state.modify(|s| s.user = Some(profile.clone()));
            }
            Ok::<_, ApiError>(profile)
        }
        .await;
        self.settle(result, UPDATE_FAILED)
    }

    /// Delete the account on the server, then sign out locally. Nothing is
    /// cleared if the server refuses.
    ///
    /// # Errors
    ///
    /// The HTTP layer error.
    pub async fn delete_account(&self) -> Result<(), ApiError> {
        self.begin();
        let result = api::delete_me(&self.api).await;
        if result.is_ok() {
            self.logout();
        }
        self.settle(result, DELETE_FAILED)
    }

    /// Adopt a token/profile pair produced by an external OAuth redirect.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank token; `Storage` if persisting fails.
    pub fn process_oauth_login(&self, token: &str, user: UserProfile) -> Result<UserProfile, ApiError> {
        self.begin();
        let result = if token.trim().is_empty() {
            Err(ApiError::Validation("Sign-in response is missing credentials.".to_owned()))
        } else {
            self.establish(token, user)
        };
        self.settle(result, OAUTH_FAILED)
    }

    /// Parse OAuth callback query parameters and sign in with them.
    ///
    /// # Errors
    ///
    /// `Validation` when the parameters are incomplete.
    pub fn process_oauth_callback(&self, params: OAuthCallbackParams) -> Result<UserProfile, ApiError> {
        match params.into_credentials() {
            Ok((token, user)) => self.process_oauth_login(&token, user),
            Err(e) => {
                self.begin();
                self.settle(Err(e), OAUTH_FAILED)
            }
        }
    }

    /// Clear a displayed error without starting an operation.
    pub fn dismiss_error(&self) {
        self.begin();
    }

    fn establish(&self, token: &str, user: UserProfile) -> Result<UserProfile, ApiError> {
        self.api.credentials().save(token, &user)?;
        self.bump_epoch();
        self.state.modify(|s| {
            s.user = Some(user.clone());
            s.loading = false;
        });
        Ok(user)
    }

    fn begin(&self) {
        self.state.modify(|s| s.error = None);
    }

    fn settle<T>(&self, result: Result<T, ApiError>, fallback: &str) -> Result<T, ApiError> {
        if let Err(e) = &result {
            let message = e.user_message(fallback);
            self.state.modify(|s| s.error = Some(message));
        }
        result
    }

    fn bump_epoch(&self) {
        self.epoch.set(self.epoch.get() + 1);
    }
}
