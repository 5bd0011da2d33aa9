//! Workout log: type, duration, calories and date per session.

#[cfg(test)]
#[path = "workout_test.rs"]
mod workout_test;

use leptos::prelude::*;

use super::study::{format_minutes, parse_minutes};
use crate::net::types::{NewWorkoutRecord, WorkoutRecord};
use crate::state::session::{use_auth, use_session};

pub const WORKOUT_TYPES: [&str; 6] = ["Running", "Walking", "Cycling", "Swimming", "Strength", "Yoga"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkoutForm {
    pub workout_type: String,
    pub minutes: String,
    pub calories: String,
    /// `YYYY-MM-DD` from the date input, or blank.
    pub date: String,
    pub memo: String,
}

impl Default for WorkoutForm {
    fn default() -> Self {
        Self {
            workout_type: WORKOUT_TYPES[0].to_owned(),
            minutes: String::new(),
            calories: String::new(),
            date: String::new(),
            memo: String::new(),
        }
    }
}

impl WorkoutForm {
    /// # Errors
    ///
    /// Returns a message for a blank type, bad duration or bad calories.
    pub fn to_record(&self, user_id: u64) -> Result<NewWorkoutRecord, String> {
        let workout_type = self.workout_type.trim();
        if workout_type.is_empty() {
            return Err("Choose a workout type.".to_owned());
        }
        let calories = match self.calories.trim() {
            "" => 0,
            raw => raw.parse::<u32>().map_err(|_| "Calories must be a whole number.".to_owned())?,
        };
        let keep = |value: &str| {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_owned())
        };
        Ok(NewWorkoutRecord {
            user_id,
            workout_type: workout_type.to_owned(),
            duration: parse_minutes(&self.minutes)?,
            calories,
            workout_date: keep(&self.date),
            memo: keep(&self.memo),
        })
    }
}

/// Total minutes and calories.
pub fn totals(records: &[WorkoutRecord]) -> (u32, u32) {
    records.iter().fold((0, 0), |(minutes, calories), r| (minutes + r.duration, calories + r.calories))
}

#[component]
pub fn WorkoutPage() -> impl IntoView {
    let auth = use_auth();
    let session = use_session();
    let records = RwSignal::new(Vec::<WorkoutRecord>::new());
    let form = RwSignal::new(WorkoutForm::default());
    let error = RwSignal::new(None::<String>);

    Effect::new(move || {
        let Some(user_id) = auth.get().user_id() else {
            return;
        };
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::api::list_workout_records(session.get_value().api(), user_id).await {
                Ok(list) => records.set(list),
                Err(e) => error.set(Some(e.user_message("Could not load workouts."))),
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
            match crate::net::api::create_workout_record(session.get_value().api(), &record).await {
                Ok(created) => {
                    records.update(|list| list.insert(0, created));
                    form.set(WorkoutForm::default());
                    error.set(None);
                }
                Err(e) => error.set(Some(e.user_message("Could not save the workout."))),
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = record;
    };

    let remove = move |record_id: u64| {
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::api::delete_workout_record(session.get_value().api(), record_id).await {
                Ok(()) => records.update(|list| list.retain(|r| r.record_id != record_id)),
                Err(e) => error.set(Some(e.user_message("Could not delete the workout."))),
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = record_id;
    };

    let summary = move || {
        let (minutes, calories) = totals(&records.get());
        format!("{} · {calories} kcal", format_minutes(minutes))
    };

    view! {
        <section class="records records--workout">
            <h1>"Workout"</h1>
            <p class="records__total">{summary}</p>
            <form class="records__form" on:submit=on_save>
                <select on:change=move |ev| form.update(|f| f.workout_type = event_target_value(&ev))>
                    {WORKOUT_TYPES
                        .into_iter()
                        .map(|kind| view! { <option value=kind selected=move || form.get().workout_type == kind>{kind}</option> })
                        .collect::<Vec<_>>()}
                </select>
                <input
                    type="number"
                    min="1"
                    placeholder="Minutes"
                    prop:value=move || form.get().minutes
                    on:input=move |ev| form.update(|f| f.minutes = event_target_value(&ev))
                />
                <input
                    type="number"
                    min="0"
                    placeholder="kcal"
                    prop:value=move || form.get().calories
                    on:input=move |ev| form.update(|f| f.calories = event_target_value(&ev))
                />
                <input
                    type="date"
                    prop:value=move || form.get().date
                    on:input=move |ev| form.update(|f| f.date = event_target_value(&ev))
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
                                <strong>{record.workout_type.clone()}</strong>
                                <span>{format_minutes(record.duration)}</span>
                                <span>{format!("{} kcal", record.calories)}</span>
                                <span>{record.workout_date.clone().unwrap_or_default()}</span>
                                <button on:click=move |_| remove(record_id)>"Delete"</button>
                            </li>
                        }
                    }
                </For>
            </ul>
        </section>
    }
}
