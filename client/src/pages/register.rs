//! Sign-up page. A successful registration sends the user to `/login`; no
//! session is created here.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::{A, Redirect};

use crate::net::types::SignupRequest;
use crate::state::session::{use_auth, use_session};

/// Raw form input before validation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub nickname: String,
    pub gender: String,
    pub phone: String,
    pub address: String,
    pub address_detail: String,
    pub post_code: String,
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

impl RegisterForm {
    /// Validate form-only rules and build the request body. Credential shape
    /// is checked again by the session controller.
    ///
    /// # Errors
    ///
    /// Returns a user-facing message for the first failing rule.
    pub fn into_request(self) -> Result<SignupRequest, String> {
        if self.password.chars().count() < 8 {
            return Err("Password must be at least 8 characters.".to_owned());
        }
        if self.password != self.password_confirm {
            return Err("Passwords do not match.".to_owned());
        }
        let nickname = self.nickname.trim();
        if nickname.is_empty() {
            return Err("Choose a nickname.".to_owned());
        }
        Ok(SignupRequest {
            email: self.email.trim().to_owned(),
            password: self.password,
            nickname: nickname.to_owned(),
            gender: optional(&self.gender),
            phone: optional(&self.phone),
            address: optional(&self.address),
            address_detail: optional(&self.address_detail),
            post_code: optional(&self.post_code),
            profile_image: None,
        })
    }
}

/// One labelled input bound to one field of the form signal.
fn form_field(
    form: RwSignal<RegisterForm>,
    label: &'static str,
    kind: &'static str,
    get: fn(&RegisterForm) -> &String,
    set: fn(&mut RegisterForm, String),
) -> impl IntoView {
    view! {
        <label class="register-field">
            <span>{label}</span>
            <input
                class="login-input"
                type=kind
                prop:value=move || form.with(|f| get(f).clone())
                on:input=move |ev| form.update(|f| set(f, event_target_value(&ev)))
            />
        </label>
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = use_auth();
    let session = use_session();
    let form = RwSignal::new(RegisterForm::default());
    let local_error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);
    let registered = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let request = match form.get().into_request() {
            Ok(request) => request,
            Err(message) => {
                local_error.set(Some(message));
                return;
            }
        };
        local_error.set(None);
        busy.set(true);

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            if session.get_value().signup(&request).await.is_ok() {
                registered.set(true);
            }
            busy.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (session, request);
    };

    let error = move || local_error.get().or_else(|| auth.get().error);

    view! {
        <Show when=move || registered.get()>
            <Redirect path="/login" options=NavigateOptions { replace: true, ..NavigateOptions::default() }/>
        </Show>
        <div class="login-page">
            <div class="login-card">
                <h1>"Create an account"</h1>
                <form class="login-form" on:submit=on_submit>
                    {form_field(form, "Email", "email", |f| &f.email, |f, v| f.email = v)}
                    {form_field(form, "Password", "password", |f| &f.password, |f, v| f.password = v)}
                    {form_field(form, "Confirm password", "password", |f| &f.password_confirm, |f, v| f.password_confirm = v)}
                    {form_field(form, "Nickname", "text", |f| &f.nickname, |f, v| f.nickname = v)}
                    <label class="register-field">
                        <span>"Gender"</span>
                        <select on:change=move |ev| form.update(|f| f.gender = event_target_value(&ev))>
                            <option value="">"Prefer not to say"</option>
                            <option value="MALE">"Male"</option>
                            <option value="FEMALE">"Female"</option>
                        </select>
                    </label>
                    {form_field(form, "Phone", "tel", |f| &f.phone, |f, v| f.phone = v)}
                    {form_field(form, "Post code", "text", |f| &f.post_code, |f, v| f.post_code = v)}
                    {form_field(form, "Address", "text", |f| &f.address, |f, v| f.address = v)}
                    {form_field(form, "Address detail", "text", |f| &f.address_detail, |f, v| f.address_detail = v)}
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Sign up"
                    </button>
                </form>
                <Show when=move || error().is_some()>
                    <p class="login-message">{move || error().unwrap_or_default()}</p>
                </Show>
                <p class="login-card__footer">
                    "Already registered? "
                    <A href="/login">"Log in"</A>
                </p>
            </div>
        </div>
    }
}
