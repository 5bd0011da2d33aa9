//! Daily to-do list for the signed-in user.

#[cfg(test)]
#[path = "todos_test.rs"]
mod todos_test;

use leptos::prelude::*;

use crate::net::types::{NewTodo, Todo};
use crate::state::session::{use_auth, use_session};

/// Todos not yet completed.
pub fn pending_count(todos: &[Todo]) -> usize {
    todos.iter().filter(|t| !t.is_completed).count()
}

/// Flip completion of `todo_id` in place after the server accepted it.
pub fn apply_toggle(todos: &mut [Todo], todo_id: u64) {
    if let Some(todo) = todos.iter_mut().find(|t| t.todo_id == todo_id) {
        todo.is_completed = !todo.is_completed;
    }
}

/// Pending first, then completed; newest first within each group.
pub fn sorted(mut todos: Vec<Todo>) -> Vec<Todo> {
    todos.sort_by(|a, b| a.is_completed.cmp(&b.is_completed).then(b.todo_id.cmp(&a.todo_id)));
    todos
}

#[component]
pub fn TodosPage() -> impl IntoView {
    let auth = use_auth();
    let session = use_session();
    let todos = RwSignal::new(Vec::<Todo>::new());
    let draft = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);

    Effect::new(move || {
        let Some(user_id) = auth.get().user_id() else {
            return;
        };
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::api::list_todos(session.get_value().api(), user_id).await {
                Ok(list) => todos.set(sorted(list)),
                Err(e) => error.set(Some(e.user_message("Could not load your to-dos."))),
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (user_id, session);
    });

    let on_add = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(user_id) = auth.get_untracked().user_id() else {
            return;
        };
        let todo = NewTodo { user_id, content: draft.get().trim().to_owned(), is_completed: false };

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::api::create_todo(session.get_value().api(), &todo).await {
                Ok(created) => {
                    draft.set(String::new());
                    error.set(None);
                    todos.update(|list| {
                        list.push(created);
                        *list = sorted(std::mem::take(list));
                    });
                }
                Err(e) => error.set(Some(e.user_message("Could not add the to-do."))),
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = todo;
    };

    let toggle = move |todo: Todo| {
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            let update = crate::net::types::TodoStatusUpdate::toggled(&todo);
            match crate::net::api::update_todo_status(session.get_value().api(), &update).await {
                Ok(()) => todos.update(|list| {
                    apply_toggle(list, todo.todo_id);
                    *list = sorted(std::mem::take(list));
                }),
                Err(e) => error.set(Some(e.user_message("Could not update the to-do."))),
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = todo;
    };

    let remove = move |todo_id: u64| {
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::api::delete_todo(session.get_value().api(), todo_id).await {
                Ok(()) => todos.update(|list| list.retain(|t| t.todo_id != todo_id)),
                Err(e) => error.set(Some(e.user_message("Could not delete the to-do."))),
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = todo_id;
    };

    view! {
        <section class="todos">
            <h1>"To-dos"</h1>
            <p class="todos__summary">{move || format!("{} left", pending_count(&todos.get()))}</p>
            <form class="todos__form" on:submit=on_add>
                <input
                    placeholder="What needs doing?"
                    prop:value=move || draft.get()
                    on:input=move |ev| draft.set(event_target_value(&ev))
                />
                <button type="submit">"Add"</button>
            </form>
            <Show when=move || error.get().is_some()>
                <p class="page-error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <ul class="todos__list">
                <For each=move || todos.get() key=|t| (t.todo_id, t.is_completed) let:todo>
                    {
                        let for_toggle = todo.clone();
                        let todo_id = todo.todo_id;
                        view! {
                            <li class="todos__item" class:done=todo.is_completed>
                                <input
                                    type="checkbox"
                                    prop:checked=todo.is_completed
                                    on:change=move |_| toggle(for_toggle.clone())
                                />
                                <span>{todo.content.clone()}</span>
                                <button class="todos__delete" on:click=move |_| remove(todo_id)>
                                    "Delete"
                                </button>
                            </li>
                        }
                    }
                </For>
            </ul>
        </section>
    }
}
