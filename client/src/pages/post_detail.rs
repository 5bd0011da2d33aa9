//! One workout post: full view, live like status, and author editing.

#[cfg(test)]
#[path = "post_detail_test.rs"]
mod post_detail_test;

use leptos::prelude::*;
use leptos_router::components::{A, Redirect};
use leptos_router::hooks::use_params_map;

use super::posts::{POST_CATEGORIES, PostForm};
use crate::net::types::{FileUpload, LikeState, WorkoutPost, WorkoutPostDraft, WorkoutPostEntry};
use crate::state::session::{use_auth, use_session};
use crate::util::upload::validate_image;

/// Post id from the route segment. Zero and junk are not ids.
pub fn parse_post_id(raw: Option<&str>) -> Option<u64> {
    raw?.trim().parse::<u64>().ok().filter(|id| *id > 0)
}

/// Adopt the server's like count and flag.
pub fn apply_like_state(entry: &mut WorkoutPostEntry, state: &LikeState) {
    entry.workout_post.like_count = state.like_count;
    entry.liked_by_user = state.is_liked;
}

/// Draft for an edit. Without a new photo the current image stays.
///
/// # Errors
///
/// Returns the form or image validation message.
pub fn edit_draft(form: &PostForm, current: &WorkoutPost, image: Option<&FileUpload>) -> Result<WorkoutPostDraft, String> {
    let mut draft = form.to_draft()?;
    match image {
        Some(image) => validate_image(image)?,
        None => draft.image_url = current.image_url.clone(),
    }
    Ok(draft)
}

#[component]
pub fn PostDetailPage() -> impl IntoView {
    let auth = use_auth();
    let session = use_session();
    let params = use_params_map();
    let entry = RwSignal::new(None::<WorkoutPostEntry>);
    let editing = RwSignal::new(false);
    let form = RwSignal::new(PostForm::default());
    let image = RwSignal::new(None::<FileUpload>);
    let error = RwSignal::new(None::<String>);
    let deleted = RwSignal::new(false);

    let post_id = move || parse_post_id(params.read().get("id").as_deref());

    // Load the post, then refresh the like flag for this viewer.
    Effect::new(move || {
        let Some(post_id) = post_id() else {
            error.set(Some("Post not found.".to_owned()));
            return;
        };
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            let api = session.get_value().api().clone();
            match crate::net::api::get_post(&api, post_id).await {
                Ok(loaded) => {
                    entry.set(Some(loaded));
                    error.set(None);
                }
                Err(e) => {
                    error.set(Some(e.user_message("Could not load the post.")));
                    return;
                }
            }
            match crate::net::api::like_status(&api, post_id).await {
                Ok(state) => entry.update(|e| {
                    if let Some(e) = e.as_mut() {
                        apply_like_state(e, &state);
                    }
                }),
                Err(e) => leptos::logging::warn!("like status for post {post_id} failed: {e}"),
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (post_id, session, entry);
    });

    let on_like = move |_| {
        let Some(post_id) = post_id() else {
            return;
        };
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::api::toggle_like(session.get_value().api(), post_id).await {
                Ok(state) => entry.update(|e| {
                    if let Some(e) = e.as_mut() {
                        apply_like_state(e, &state);
                    }
                }),
                Err(e) => error.set(Some(e.user_message("Could not update the like."))),
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = post_id;
    };

    let start_edit = move |_| {
        if let Some(current) = entry.get_untracked() {
            form.set(PostForm::from_post(&current.workout_post));
            image.set(None);
            editing.set(true);
        }
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

    let on_save = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(current) = entry.get_untracked() else {
            return;
        };
        let photo = image.get_untracked();
        let draft = match edit_draft(&form.get_untracked(), &current.workout_post, photo.as_ref()) {
            Ok(draft) => draft,
            Err(message) => {
                error.set(Some(message));
                return;
            }
        };
        let post_id = current.workout_post.post_id;

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::api::update_post(session.get_value().api(), post_id, &draft, photo.as_ref()).await {
                Ok(mut updated) => {
                    // The update response does not know who is looking.
                    updated.liked_by_user = current.liked_by_user;
                    entry.set(Some(updated));
                    editing.set(false);
                    error.set(None);
                }
                Err(e) => error.set(Some(e.user_message("Could not save the post."))),
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (post_id, draft, photo);
    };

    let on_delete = move |_| {
        let Some(post_id) = post_id() else {
            return;
        };
        #[cfg(feature = "hydrate")]
        {
            let confirmed = web_sys::window()
                .and_then(|w| w.confirm_with_message("Delete this post?").ok())
                .unwrap_or(false);
            if !confirmed {
                return;
            }
            leptos::task::spawn_local(async move {
                match crate::net::api::delete_post(session.get_value().api(), post_id).await {
                    Ok(()) => deleted.set(true),
                    Err(e) => error.set(Some(e.user_message("Could not delete the post."))),
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = post_id;
    };

    let own = move || {
        let me = auth.get().user_id();
        entry.get().is_some_and(|e| me == Some(e.workout_post.user_id))
    };

    view! {
        <Show when=move || deleted.get()>
            <Redirect path="/posts"/>
        </Show>
        <section class="post-detail">
            <A href="/posts">"Back to community"</A>
            <Show when=move || error.get().is_some()>
                <p class="page-error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            {move || {
                entry
                    .get()
                    .map(|current| {
                        let post = current.workout_post;
                        view! {
                            <article class="post-detail__post">
                                <h1>{post.title}</h1>
                                <p class="post-detail__meta">
                                    {current.author_name.unwrap_or_default()} " · "
                                    {post.workout_category.unwrap_or_default()} " · "
                                    {format!("{} views", post.view_count)}
                                </p>
                                {post.image_url.map(|src| view! { <img class="post-detail__image" src=src alt=""/> })}
                                <p>{post.content}</p>
                                <button class="posts__like" class:liked=current.liked_by_user on:click=on_like>
                                    {format!("♥ {}", post.like_count)}
                                </button>
                            </article>
                        }
                    })
            }}
            <Show when=move || own() && !editing.get()>
                <div class="post-detail__actions">
                    <button on:click=start_edit>"Edit"</button>
                    <button on:click=on_delete>"Delete"</button>
                </div>
            </Show>
            <Show when=move || editing.get()>
                <form class="posts__form" on:submit=on_save>
                    <input
                        placeholder="Title"
                        prop:value=move || form.get().title
                        on:input=move |ev| form.update(|f| f.title = event_target_value(&ev))
                    />
                    <select
                        prop:value=move || form.get().category
                        on:change=move |ev| form.update(|f| f.category = event_target_value(&ev))
                    >
                        <option value="">"Category"</option>
                        {POST_CATEGORIES
                            .into_iter()
                            .map(|c| view! { <option value=c>{c}</option> })
                            .collect::<Vec<_>>()}
                    </select>
                    <textarea
                        prop:value=move || form.get().content
                        on:input=move |ev| form.update(|f| f.content = event_target_value(&ev))
                    ></textarea>
                    <input type="file" accept="image/*" on:change=on_pick_image/>
                    <button type="submit">"Save"</button>
                    <button type="button" on:click=move |_| editing.set(false)>"Cancel"</button>
                </form>
            </Show>
        </section>
    }
}
