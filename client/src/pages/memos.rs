//! Markdown memos: list, create, edit, delete.

#[cfg(test)]
#[path = "memos_test.rs"]
mod memos_test;

use leptos::prelude::*;

use crate::components::markdown::Markdown;
use crate::net::types::{Memo, MemoDraft};
use crate::state::session::{use_auth, use_session};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoForm {
    /// `Some` while editing an existing memo.
    pub editing: Option<u64>,
    pub title: String,
    pub category: String,
    pub content: String,
}

impl MemoForm {
    pub fn edit(memo: &Memo) -> Self {
        Self {
            editing: Some(memo.memo_id),
            title: memo.title.clone(),
            category: memo.category.clone().unwrap_or_default(),
            content: memo.content.clone(),
        }
    }

    /// # Errors
    ///
    /// Returns a message when the title is blank.
    pub fn to_draft(&self, user_id: u64) -> Result<MemoDraft, String> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err("Enter a title.".to_owned());
        }
        let category = self.category.trim();
        Ok(MemoDraft {
            user_id,
            title: title.to_owned(),
            content: self.content.clone(),
            category: (!category.is_empty()).then(|| category.to_owned()),
        })
    }
}

/// Replace the memo with the same id, or put a new one first.
pub fn upsert(memos: &mut Vec<Memo>, memo: Memo) {
    match memos.iter_mut().find(|m| m.memo_id == memo.memo_id) {
        Some(existing) => *existing = memo,
        None => memos.insert(0, memo),
    }
}

/// Distinct non-empty categories in first-seen order.
pub fn categories(memos: &[Memo]) -> Vec<String> {
    let mut seen = Vec::new();
    for category in memos.iter().filter_map(|m| m.category.as_deref()).filter(|c| !c.is_empty()) {
        if !seen.iter().any(|s| s == category) {
            seen.push(category.to_owned());
        }
    }
    seen
}

#[component]
pub fn MemosPage() -> impl IntoView {
    let auth = use_auth();
    let session = use_session();
    let memos = RwSignal::new(Vec::<Memo>::new());
    let form = RwSignal::new(MemoForm::default());
    let filter = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);

    Effect::new(move || {
        let Some(user_id) = auth.get().user_id() else {
            return;
        };
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::api::list_memos(session.get_value().api(), user_id).await {
                Ok(list) => memos.set(list),
                Err(e) => error.set(Some(e.user_message("Could not load memos."))),
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (user_id, session);
    });

    let on_save = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(user_id) = auth.get_untracked().user_id() else {
            return;
        };
        let current = form.get();
        let draft = match current.to_draft(user_id) {
            Ok(draft) => draft,
            Err(message) => {
                error.set(Some(message));
                return;
            }
        };

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            let session = session.get_value();
            let result = match current.editing {
                Some(memo_id) => crate::net::api::update_memo(session.api(), memo_id, &draft).await,
                None => crate::net::api::create_memo(session.api(), &draft).await,
            };
            match result {
                Ok(memo) => {
                    memos.update(|list| upsert(list, memo));
                    form.set(MemoForm::default());
                    error.set(None);
                }
                Err(e) => error.set(Some(e.user_message("Could not save the memo."))),
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = draft;
    };

    let remove = move |memo_id: u64| {
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::api::delete_memo(session.get_value().api(), memo_id).await {
                Ok(()) => memos.update(|list| list.retain(|m| m.memo_id != memo_id)),
                Err(e) => error.set(Some(e.user_message("Could not delete the memo."))),
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = memo_id;
    };

    let visible = move || {
        let filter = filter.get();
        memos
            .get()
            .into_iter()
            .filter(|m| filter.is_empty() || m.category.as_deref() == Some(filter.as_str()))
            .collect::<Vec<_>>()
    };
    let preview = Signal::derive(move || form.get().content);

    view! {
        <section class="memos">
            <h1>"Memos"</h1>
            <form class="memos__form" on:submit=on_save>
                <input
                    placeholder="Title"
                    prop:value=move || form.get().title
                    on:input=move |ev| form.update(|f| f.title = event_target_value(&ev))
                />
                <input
                    placeholder="Category"
                    prop:value=move || form.get().category
                    on:input=move |ev| form.update(|f| f.category = event_target_value(&ev))
                />
                <textarea
                    placeholder="Write in markdown"
                    prop:value=move || form.get().content
                    on:input=move |ev| form.update(|f| f.content = event_target_value(&ev))
                ></textarea>
                <Markdown source=preview/>
                <button type="submit">{move || if form.get().editing.is_some() { "Update" } else { "Save" }}</button>
                <Show when=move || form.get().editing.is_some()>
                    <button type="button" on:click=move |_| form.set(MemoForm::default())>
                        "Cancel"
                    </button>
                </Show>
            </form>
            <Show when=move || error.get().is_some()>
                <p class="page-error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <div class="memos__filters">
                <button on:click=move |_| filter.set(String::new())>"All"</button>
                {move || {
                    categories(&memos.get())
                        .into_iter()
                        .map(|category| {
                            let value = category.clone();
                            view! { <button on:click=move |_| filter.set(value.clone())>{category}</button> }
                        })
                        .collect::<Vec<_>>()
                }}
            </div>
            <ul class="memos__list">
                <For each=visible key=|m| (m.memo_id, m.title.clone(), m.content.clone()) let:memo>
                    {
                        let memo_id = memo.memo_id;
                        let title = memo.title.clone();
                        let content = memo.content.clone();
                        let for_edit = memo;
                        view! {
                            <li class="memos__item">
                                <h2>{title}</h2>
                                <Markdown source=Signal::derive(move || content.clone())/>
                                <button on:click=move |_| form.set(MemoForm::edit(&for_edit))>"Edit"</button>
                                <button on:click=move |_| remove(memo_id)>"Delete"</button>
                            </li>
                        }
                    }
                </For>
            </ul>
        </section>
    }
}
