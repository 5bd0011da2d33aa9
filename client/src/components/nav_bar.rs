//! Top navigation bar with feature links, session controls and the dark
//! mode toggle.
//!
//! SYSTEM CONTEXT
//! ==============
//! Rendered once above the router outlet. Reads the auth signal only; logout
//! goes through the session controller so storage and state clear together.

use leptos::prelude::*;
use leptos_router::components::A;

use crate::state::session::{use_auth, use_session};
use crate::util::dark_mode;

/// Feature links shown to signed-in users.
pub const FEATURE_LINKS: [(&str, &str); 6] = [
    ("/todos", "Todos"),
    ("/memos", "Memos"),
    ("/study", "Study"),
    ("/workout", "Workout"),
    ("/posts", "Community"),
    ("/mypage", "My Page"),
];

#[component]
pub fn NavBar() -> impl IntoView {
    let auth = use_auth();
    let session = use_session();
    let dark = RwSignal::new(false);

    Effect::new(move || {
        let enabled = dark_mode::read_preference();
        dark_mode::apply(enabled);
        dark.set(enabled);
    });

    let on_logout = move |_| session.get_value().logout();
    let on_toggle_dark = move |_| dark.update(|d| *d = dark_mode::toggle(*d));

    let nickname = move || auth.get().user.map(|u| u.nickname).unwrap_or_default();

    view! {
        <nav class="nav-bar">
            <A href="/" attr:class="nav-bar__brand">
                "Mindset"
            </A>
            <Show when=move || auth.get().is_authenticated()>
                <ul class="nav-bar__links">
                    {FEATURE_LINKS
                        .into_iter()
                        .map(|(href, label)| view! { <li><A href=href>{label}</A></li> })
                        .collect::<Vec<_>>()}
                </ul>
            </Show>
            <div class="nav-bar__session">
                <button class="nav-bar__theme" on:click=on_toggle_dark>
                    {move || if dark.get() { "Light" } else { "Dark" }}
                </button>
                <Show
                    when=move || auth.get().is_authenticated()
                    fallback=|| {
                        view! {
                            <A href="/login">"Log in"</A>
                            <A href="/register">"Sign up"</A>
                        }
                    }
                >
                    <span class="nav-bar__user">{nickname}</span>
                    <button class="nav-bar__logout" on:click=on_logout>
                        "Log out"
                    </button>
                </Show>
            </div>
        </nav>
    }
}
