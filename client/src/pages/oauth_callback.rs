//! Landing route for the social-login redirect. The backend appends
//! `token`, `userId`, `email` and `nickname` to the query string.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::{A, Redirect};
use leptos_router::hooks::use_location;

use crate::net::types::OAuthCallbackParams;
use crate::state::session::use_session;

#[component]
pub fn OAuthCallbackPage() -> impl IntoView {
    let session = use_session();
    let location = use_location();
    let outcome = RwSignal::new(None::<Result<(), String>>);

    // Effects only run in the browser, so the callback is processed once after
    // hydration.
    Effect::new(move || {
        let params = OAuthCallbackParams::from_query(&location.search.get_untracked());
        let result = session
            .get_value()
            .process_oauth_callback(params)
            .map(|_| ())
            .map_err(|e| e.user_message("Social sign-in failed."));
        if let Err(message) = &result {
            leptos::logging::warn!("oauth callback rejected: {message}");
        }
        outcome.set(Some(result));
    });

    move || match outcome.get() {
        None => view! { <p class="oauth-status">"Signing you in..."</p> }.into_any(),
        Some(Ok(())) => {
            view! { <Redirect path="/" options=NavigateOptions { replace: true, ..NavigateOptions::default() }/> }
                .into_any()
        }
        Some(Err(message)) => view! {
            <div class="oauth-status oauth-status--error">
                <p>{message}</p>
                <A href="/login">"Back to login"</A>
            </div>
        }
        .into_any(),
    }
}
