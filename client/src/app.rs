//! Root application component with routing and context providers.

use std::rc::Rc;

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::nav_bar::NavBar;
use crate::components::require_auth::RequireAuth;
use crate::config::ApiConfig;
use crate::net::http::ApiClient;
use crate::pages::{
    home::HomePage, login::LoginPage, memos::MemosPage, my_page::MyPage, oauth_callback::OAuthCallbackPage,
    post_detail::PostDetailPage, posts::PostsPage, register::RegisterPage, study::StudyPage, todos::TodosPage,
    workout::WorkoutPage,
};
use crate::state::auth::AuthState;
use crate::state::session::{SessionContext, SessionController};

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Builds the session controller, provides it and the auth signal as
/// context, starts startup reconciliation in the browser, and sets up
/// routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let auth = RwSignal::new(AuthState::default());
    let api = Rc::new(ApiClient::browser(ApiConfig::from_env()));
    let session: SessionContext = StoredValue::new_local(SessionController::new(api, auth));

    provide_context(auth);
    provide_context(session);

    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        session.get_value().init().await;
    });

    view! {
        <Stylesheet id="leptos" href="/pkg/mindset.css"/>
        <Title text="Mindset"/>

        <Router>
            <NavBar/>
            <main>
                <Routes fallback=|| view! { <p class="not-found">"Page not found."</p> }>
                    <Route path=StaticSegment("") view=HomePage/>
                    <Route path=StaticSegment("login") view=LoginPage/>
                    <Route path=StaticSegment("register") view=RegisterPage/>
                    <Route path=(StaticSegment("oauth"), StaticSegment("callback")) view=OAuthCallbackPage/>
                    <Route path=StaticSegment("mypage") view=|| view! { <RequireAuth><MyPage/></RequireAuth> }/>
                    <Route path=StaticSegment("todos") view=|| view! { <RequireAuth><TodosPage/></RequireAuth> }/>
                    <Route path=StaticSegment("memos") view=|| view! { <RequireAuth><MemosPage/></RequireAuth> }/>
                    <Route path=StaticSegment("study") view=|| view! { <RequireAuth><StudyPage/></RequireAuth> }/>
                    <Route path=StaticSegment("workout") view=|| view! { <RequireAuth><WorkoutPage/></RequireAuth> }/>
                    <Route path=StaticSegment("posts") view=|| view! { <RequireAuth><PostsPage/></RequireAuth> }/>
                    <Route
                        path=(StaticSegment("posts"), ParamSegment("id"))
                        view=|| view! { <RequireAuth><PostDetailPage/></RequireAuth> }
                    />
                </Routes>
            </main>
        </Router>
    }
}
