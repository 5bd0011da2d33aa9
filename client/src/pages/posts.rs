//! Community feed of workout posts: cursor paging, category filter, popular
//! and own-post tabs, likes, and posting with an optional photo.
//!
//! DESIGN
//! ======
//! Each feed switch bumps a generation counter. Page responses that arrive
//! for an older generation are dropped, so a slow "All" page never lands in
//! the "Popular" list.

#[cfg(test)]
#[path = "posts_test.rs"]
mod posts_test;

use leptos::prelude::*;
use leptos_router::components::A;

use crate::net::api::PostFeed;
use crate::net::types::{FileUpload, LikeState, WorkoutPost, WorkoutPostDraft, WorkoutPostEntry, WorkoutPostPage};
use crate::state::session::{use_auth, use_session};
use crate::util::upload::validate_image;

pub const POST_CATEGORIES: [&str; 5] = ["Running", "Fitness", "Cycling", "Yoga", "Other"];

/// Where the next page starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeedCursor {
    pub last_post_id: Option<u64>,
    pub has_next: bool,
}

/// Append `page` to `entries`, skipping posts already shown, and return the
/// cursor for the following page.
pub fn merge_page(entries: &mut Vec<WorkoutPostEntry>, page: WorkoutPostPage) -> FeedCursor {
    for entry in page.posts {
        let id = entry.workout_post.post_id;
        if !entries.iter().any(|e| e.workout_post.post_id == id) {
            entries.push(entry);
        }
    }
    FeedCursor {
        last_post_id: page.last_post_id.or_else(|| entries.last().map(|e| e.workout_post.post_id)),
        has_next: page.has_next,
    }
}

/// Adopt the server's like count and flag for `post_id`.
pub fn apply_like(entries: &mut [WorkoutPostEntry], post_id: u64, state: &LikeState) {
    if let Some(entry) = entries.iter_mut().find(|e| e.workout_post.post_id == post_id) {
        entry.workout_post.like_count = state.like_count;
        entry.liked_by_user = state.is_liked;
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PostForm {
    pub title: String,
    pub content: String,
    pub category: String,
}

impl PostForm {
    /// Prefill from an existing post for editing.
    pub fn from_post(post: &WorkoutPost) -> Self {
        Self {
            title: post.title.clone(),
            content: post.content.clone(),
            category: post.workout_category.clone().unwrap_or_default(),
        }
    }

    /// # Errors
    ///
    /// Returns a message when title or content is blank.
    pub fn to_draft(&self) -> Result<WorkoutPostDraft, String> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err("Enter a title.".to_owned());
        }
        if self.content.trim().is_empty() {
            return Err("Write something about your workout.".to_owned());
        }
        let category = self.category.trim();
        Ok(WorkoutPostDraft {
            title: title.to_owned(),
            content: self.content.clone(),
            workout_category: (!category.is_empty()).then(|| category.to_owned()),
            image_url: None,
        })
    }
}

pub fn post_path(post_id: u64) -> String {
    format!("/posts/{post_id}")
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FeedTab {
    #[default]
    Latest,
    Popular,
    Mine,
}

/// Map the selected tab and category onto an API feed.
pub fn feed_for(tab: FeedTab, category: &str, user_id: Option<u64>) -> Option<PostFeed> {
    match tab {
        FeedTab::Latest => Some(PostFeed::All { category: (!category.is_empty()).then(|| category.to_owned()) }),
        FeedTab::Popular => Some(PostFeed::Popular),
        FeedTab::Mine => user_id.map(PostFeed::ByUser),
    }
}

#[component]
pub fn PostsPage() -> impl IntoView {
    let auth = use_auth();
    let session = use_session();
    let tab = RwSignal::new(FeedTab::default());
    let category = RwSignal::new(String::new());
    let entries = RwSignal::new(Vec::<WorkoutPostEntry>::new());
    let cursor = RwSignal::new(FeedCursor::default());
    let generation = RwSignal::new(0_u64);
    let loading = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);
    let form = RwSignal::new(PostForm::default());
    let image = RwSignal::new(None::<FileUpload>);

    // Fetch one page for the current feed. `reset` starts a new generation.
    let load = move |reset: bool| {
        let Some(feed) = feed_for(tab.get_untracked(), &category.get_untracked(), auth.get_untracked().user_id())
        else {
            return;
        };
        if reset {
            generation.update(|g| *g += 1);
            entries.set(Vec::new());
            cursor.set(FeedCursor::default());
        }
        let expected = generation.get_untracked();
        let after = cursor.get_untracked().last_post_id;
        loading.set(true);

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            let result = crate::net::api::list_posts(
                session.get_value().api(),
                &feed,
                after,
                crate::net::api::DEFAULT_PAGE_SIZE,
            )
            .await;
            if generation.get_untracked() != expected {
                return;
            }
            match result {
                Ok(page) => {
                    let mut next = FeedCursor::default();
                    entries.update(|list| next = merge_page(list, page));
                    cursor.set(next);
                    error.set(None);
                }
                Err(e) => error.set(Some(e.user_message("Could not load posts."))),
            }
            loading.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (feed, expected, after, session);
    };

    Effect::new(move || {
        tab.track();
        category.track();
        load(true);
    });

    let on_like = move |post_id: u64| {
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::api::toggle_like(session.get_value().api(), post_id).await {
                Ok(state) => entries.update(|list| apply_like(list, post_id, &state)),
                Err(e) => error.set(Some(e.user_message("Could not update the like."))),
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = post_id;
    };

    let on_delete = move |post_id: u64| {
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::api::delete_post(session.get_value().api(), post_id).await {
                Ok(()) => entries.update(|list| list.retain(|e| e.workout_post.post_id != post_id)),
                Err(e) => error.set(Some(e.user_message("Could not delete the post."))),
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = post_id;
    };

    let on_pick_image = move |ev: leptos::ev::Event| {
        #[cfg(feature = "hydrate")]
        {
            use wasm_bindgen::JsCast;
            let Some(input) = ev.target().and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok()) else {
                return;
            };
            leptos::task::spawn_local(async move {
                image.set(crate::util::upload::read_input_file(&input).await);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = (ev, image);
    };

    let on_post = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let draft = match form.get().to_draft() {
            Ok(draft) => draft,
            Err(message) => {
                error.set(Some(message));
                return;
            }
        };
        let photo = image.get();
        if let Some(Err(message)) = photo.as_ref().map(validate_image) {
            error.set(Some(message));
            return;
        }

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::api::create_post(session.get_value().api(), &draft, photo.as_ref()).await {
                Ok(created) => {
                    entries.update(|list| list.insert(0, created));
                    form.set(PostForm::default());
                    image.set(None);
                    error.set(None);
                }
                Err(e) => error.set(Some(e.user_message("Could not publish the post."))),
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (draft, photo);
    };

    let my_id = move || auth.get().user_id();
    let tab_button = move |label: &'static str, value: FeedTab| {
        view! {
            <button class="posts__tab" class:active=move || tab.get() == value on:click=move |_| tab.set(value)>
                {label}
            </button>
        }
    };

    view! {
        <section class="posts">
            <h1>"Community"</h1>
            <form class="posts__form" on:submit=on_post>
                <input
                    placeholder="Title"
                    prop:value=move || form.get().title
                    on:input=move |ev| form.update(|f| f.title = event_target_value(&ev))
                />
                <select on:change=move |ev| form.update(|f| f.category = event_target_value(&ev))>
                    <option value="">"Category"</option>
                    {POST_CATEGORIES
                        .into_iter()
                        .map(|c| view! { <option value=c>{c}</option> })
                        .collect::<Vec<_>>()}
                </select>
                <textarea
                    placeholder="How did it go?"
                    prop:value=move || form.get().content
                    on:input=move |ev| form.update(|f| f.content = event_target_value(&ev))
                ></textarea>
                <input type="file" accept="image/*" on:change=on_pick_image/>
                <button type="submit">"Post"</button>
            </form>
            <div class="posts__tabs">
                {tab_button("Latest", FeedTab::Latest)}
                {tab_button("Popular", FeedTab::Popular)}
                {tab_button("Mine", FeedTab::Mine)}
                <Show when=move || tab.get() == FeedTab::Latest>
                    <select on:change=move |ev| category.set(event_target_value(&ev))>
                        <option value="">"All categories"</option>
                        {POST_CATEGORIES
                            .into_iter()
                            .map(|c| view! { <option value=c>{c}</option> })
                            .collect::<Vec<_>>()}
                    </select>
                </Show>
            </div>
            <Show when=move || error.get().is_some()>
                <p class="page-error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <ul class="posts__list">
                <For
                    each=move || entries.get()
                    key=|e| (e.workout_post.post_id, e.workout_post.like_count, e.liked_by_user)
                    let:entry
                >
                    {
                        let post = entry.workout_post.clone();
                        let post_id = post.post_id;
                        let own = my_id() == Some(post.user_id);
                        view! {
                            <li class="posts__item">
                                <header>
                                    <A href=post_path(post_id)><strong>{post.title.clone()}</strong></A>
                                    <span class="posts__author">{entry.author_name.clone().unwrap_or_default()}</span>
                                    <span class="posts__category">{post.workout_category.clone().unwrap_or_default()}</span>
                                </header>
                                {post.image_url.clone().map(|src| view! { <img class="posts__image" src=src alt=""/> })}
                                <p>{post.content.clone()}</p>
                                <footer>
                                    <button class="posts__like" class:liked=entry.liked_by_user on:click=move |_| on_like(post_id)>
                                        {format!("♥ {}", post.like_count)}
                                    </button>
                                    <span class="posts__views">{format!("{} views", post.view_count)}</span>
                                    {own.then(|| view! { <button on:click=move |_| on_delete(post_id)>"Delete"</button> })}
                                </footer>
                            </li>
                        }
                    }
                </For>
            </ul>
            <Show when=move || cursor.get().has_next>
                <button class="posts__more" disabled=move || loading.get() on:click=move |_| load(false)>
                    "Load more"
                </button>
            </Show>
        </section>
    }
}
