//! Landing page. Anonymous visitors see the pitch; signed-in users get
//! shortcuts into each tracker.

#[cfg(test)]
#[path = "home_test.rs"]
mod home_test;

use leptos::prelude::*;
use leptos_router::components::A;

use crate::components::nav_bar::FEATURE_LINKS;
use crate::net::types::UserProfile;
use crate::state::session::use_auth;

pub fn greeting(user: Option<&UserProfile>) -> String {
    match user.map(|u| u.nickname.trim()).filter(|n| !n.is_empty()) {
        Some(nickname) => format!("Welcome back, {nickname}."),
        None => "Build your habits, one day at a time.".to_owned(),
    }
}

#[component]
pub fn HomePage() -> impl IntoView {
    let auth = use_auth();

    view! {
        <section class="home">
            <h1>{move || greeting(auth.get().user.as_ref())}</h1>
            <Show
                when=move || auth.get().is_authenticated()
                fallback=|| {
                    view! {
                        <p>"Track todos, study sessions and workouts, keep memos, and cheer each other on."</p>
                        <A href="/login" attr:class="login-button">"Get started"</A>
                    }
                }
            >
                <div class="home__shortcuts">
                    {FEATURE_LINKS
                        .into_iter()
                        .map(|(href, label)| view! { <A href=href attr:class="home__card">{label}</A> })
                        .collect::<Vec<_>>()}
                </div>
            </Show>
        </section>
    }
}
