//! Login page: email + password, plus Kakao and Naver OAuth entry points.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::{A, Redirect};

use crate::config::ApiConfig;
use crate::state::session::{use_auth, use_session};

/// Social providers in display order, with their authorization URLs.
pub fn social_links(config: &ApiConfig) -> [(&'static str, String); 2] {
    [("Kakao", config.kakao_login_url()), ("Naver", config.naver_login_url())]
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let session = use_session();
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        busy.set(true);
        let email_value = email.get();
        let password_value = password.get();

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            // Errors also land in the auth state and render below.
            if let Err(e) = session.get_value().login(&email_value, &password_value).await {
                leptos::logging::warn!("login failed: {e}");
            }
            busy.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (session, email_value, password_value);
    };

    let socials = social_links(&ApiConfig::from_env());

    view! {
        <Show when=move || auth.get().is_authenticated()>
            <Redirect path="/" options=NavigateOptions { replace: true, ..NavigateOptions::default() }/>
        </Show>
        <div class="login-page">
            <div class="login-card">
                <h1>"Mindset"</h1>
                <p class="login-card__subtitle">"Sign in to continue"</p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Signing in..." } else { "Sign in" }}
                    </button>
                </form>
                <Show when=move || auth.get().error.is_some()>
                    <p class="login-message">{move || auth.get().error.unwrap_or_default()}</p>
                </Show>
                <div class="login-divider"></div>
                <div class="login-social">
                    {socials
                        .into_iter()
                        .map(|(label, href)| {
                            view! {
                                <a class="login-button login-button--social" href=href>
                                    {format!("Continue with {label}")}
                                </a>
                            }
                        })
                        .collect::<Vec<_>>()}
                </div>
                <p class="login-card__footer">
                    "No account yet? "
                    <A href="/register">"Sign up"</A>
                </p>
            </div>
        </div>
    }
}
