//! Study session log with running totals.

#[cfg(test)]
#[path = "study_test.rs"]
mod study_test;

use leptos::prelude::*;

use crate::net::types::{NewStudyRecord, StudyRecord};
use crate::state::session::{use_auth, use_session};

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Parse a minute count between 1 and a full day.
///
/// # Errors
///
/// Returns a message for non-numeric or out-of-range input.
pub fn parse_minutes(raw: &str) -> Result<u32, String> {
    match raw.trim().parse::<u32>() {
        Ok(minutes) if (1..=MINUTES_PER_DAY).contains(&minutes) => Ok(minutes),
        _ => Err(format!("Enter minutes between 1 and {MINUTES_PER_DAY}.")),
    }
}

/// `95` -> `1h 35m`, `40` -> `40m`.
pub fn format_minutes(minutes: u32) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StudyForm {
    pub subject: String,
    pub minutes: String,
    pub memo: String,
}

impl StudyForm {
    /// # Errors
    ///
    /// Returns a message for a blank subject or invalid duration.
    pub fn to_record(&self, user_id: u64) -> Result<NewStudyRecord, String> {
        let subject = self.subject.trim();
        if subject.is_empty() {
            return Err("Enter a subject.".to_owned());
        }
        let memo = self.memo.trim();
        Ok(NewStudyRecord {
            user_id,
            subject: subject.to_owned(),
            duration: parse_minutes(&self.minutes)?,
            start_time: None,
            end_time: None,
            memo: (!memo.is_empty()).then(|| memo.to_owned()),
        })
    }
}

pub fn total_minutes(records: &[StudyRecord]) -> u32 {
    records.iter().map(|r| r.duration).sum()
}

#[component]
pub fn StudyPage() -> impl IntoView {
    let auth = use_auth();
    let session = use_session();
    let records = RwSignal::new(Vec::<StudyRecord>::new());
    let form = RwSignal::new(StudyForm::default());
    let error = RwSignal::new(None::<String>);

    Effect::new(move || {
        let Some(user_id) = auth.get().user_id() else {
            return;
        };
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::api::list_study_records(session.get_value().api(), user_id).await {
                Ok(list) => records.set(list),
                Err(e) => error.set(Some(e.user_message("Could not load study records."))),
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
        let record = match form.get().to_record(user_id) {
            Ok(record) => record,
            Err(message) => {
                error.set(Some(message));
                return;
            }
        };

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::api::create_study_record(session.get_value().api(), &record).await {
                Ok(created) => {
                    records.update(|list| list.insert(0, created));
                    form.set(StudyForm::default());
                    error.set(None);
                }
                Err(e) => error.set(Some(e.user_message("Could not save the record."))),
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = record;
    };

    let remove = move |record_id: u64| {
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::api::delete_study_record(session.get_value().api(), record_id).await {
                Ok(()) => records.update(|list| list.retain(|r| r.record_id != record_id)),
                Err(e) => error.set(Some(e.user_message("Could not delete the record."))),
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = record_id;
    };

    view! {
        <section class="records records--study">
            <h1>"Study"</h1>
            <p class="records__total">{move || format!("Total: {}", format_minutes(total_minutes(&records.get())))}</p>
            <form class="records__form" on:submit=on_save>
                <input
                    placeholder="Subject"
                    prop:value=move || form.get().subject
                    on:input=move |ev| form.update(|f| f.subject = event_target_value(&ev))
                />
                <input
                    type="number"
                    min="1"
                    placeholder="Minutes"
                    prop:value=move || form.get().minutes
                    on:input=move |ev| form.update(|f| f.minutes = event_target_value(&ev))
                />
                <input
                    placeholder="Notes"
                    prop:value=move || form.get().memo
                    on:input=move |ev| form.update(|f| f.memo = event_target_value(&ev))
                />
                <button type="submit">"Log"</button>
            </form>
            <Show when=move || error.get().is_some()>
                <p class="page-error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <ul class="records__list">
                <For each=move || records.get() key=|r| r.record_id let:record>
                    {
                        let record_id = record.record_id;
                        view! {
                            <li class="records__item">
                                <strong>{record.subject.clone()}</strong>
                                <span>{format_minutes(record.duration)}</span>
                                <span class="records__memo">{record.memo.clone().unwrap_or_default()}</span>
                                <button on:click=move |_| remove(record_id)>"Delete"</button>
                            </li>
                        }
                    }
                </For>
            </ul>
        </section>
    }
}
