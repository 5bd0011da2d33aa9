//! Declarative route guard.
//!
//! Wrap any protected page in `<RequireAuth>`. While the session resolves
//! only the placeholder renders; anonymous visitors are sent to `/login`.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::state::session::use_auth;
use crate::util::auth::{GuardDecision, LOADING_PLACEHOLDER, guard_decision, install_unauth_redirect};

#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let _latch = install_unauth_redirect(auth, use_navigate());

    move || match guard_decision(&auth.get()) {
        GuardDecision::Render => children().into_any(),
        GuardDecision::Placeholder | GuardDecision::Redirect => {
            view! { <div class="guard-placeholder">{LOADING_PLACEHOLDER}</div> }.into_any()
        }
    }
}
