//! Profile page: edit profile fields, replace the profile image, delete the
//! account.

#[cfg(test)]
#[path = "my_page_test.rs"]
mod my_page_test;

use leptos::prelude::*;

use crate::net::types::{FileUpload, ProfileUpdate, UserProfile};
use crate::state::session::{ProfileChange, use_auth, use_session};
use crate::util::upload::validate_image;

/// Editable copy of the profile fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub nickname: String,
    pub phone: String,
    pub address: String,
    pub address_detail: String,
    pub post_code: String,
}

impl ProfileForm {
    pub fn from_profile(user: &UserProfile) -> Self {
        Self {
            nickname: user.nickname.clone(),
            phone: user.phone.clone().unwrap_or_default(),
            address: user.address.clone().unwrap_or_default(),
            address_detail: user.address_detail.clone().unwrap_or_default(),
            post_code: user.post_code.clone().unwrap_or_default(),
        }
    }

    /// Trimmed update body. Blank fields are left out so the server keeps
    /// its current value.
    ///
    /// # Errors
    ///
    /// Returns a message when the nickname is blank.
    pub fn to_update(&self) -> Result<ProfileUpdate, String> {
        let keep = |value: &str| {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_owned())
        };
        let nickname = keep(&self.nickname).ok_or_else(|| "Nickname cannot be empty.".to_owned())?;
        Ok(ProfileUpdate {
            nickname: Some(nickname),
            phone: keep(&self.phone),
            address: keep(&self.address),
            address_detail: keep(&self.address_detail),
            post_code: keep(&self.post_code),
        })
    }
}

/// Choose the JSON or multipart variant depending on whether an image is attached.
///
/// # Errors
///
/// Returns the form or image validation message.
pub fn profile_change(form: &ProfileForm, image: Option<FileUpload>) -> Result<ProfileChange, String> {
    let fields = form.to_update()?;
    match image {
        Some(image) => {
            validate_image(&image)?;
            Ok(ProfileChange::WithImage { fields, image })
        }
        None => Ok(ProfileChange::Fields(fields)),
    }
}

#[component]
pub fn MyPage() -> impl IntoView {
    let auth = use_auth();
    let session = use_session();
    let form = RwSignal::new(ProfileForm::default());
    let image = RwSignal::new(None::<FileUpload>);
    let notice = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    // Re-seed the form whenever the stored profile changes identity or content.
    Effect::new(move || {
        if let Some(user) = auth.get().user {
            form.set(ProfileForm::from_profile(&user));
        }
    });

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
        if busy.get() {
            return;
        }
        let change = match profile_change(&form.get(), image.get()) {
            Ok(change) => change,
            Err(message) => {
                notice.set(Some(message));
                return;
            }
        };
        busy.set(true);
        notice.set(None);

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match session.get_value().update_profile(change).await {
                Ok(_) => {
                    image.set(None);
                    notice.set(Some("Profile saved.".to_owned()));
                }
                Err(e) => leptos::logging::warn!("profile update failed: {e}"),
            }
            busy.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = change;
    };

    let on_delete = move |_| {
        #[cfg(feature = "hydrate")]
        {
            let confirmed = web_sys::window()
                .and_then(|w| w.confirm_with_message("Delete your account? This cannot be undone.").ok())
                .unwrap_or(false);
            if !confirmed {
                return;
            }
            leptos::task::spawn_local(async move {
                if let Err(e) = session.get_value().delete_account().await {
                    leptos::logging::warn!("account deletion failed: {e}");
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = session;
    };

    let message = move || notice.get().or_else(|| auth.get().error);
    let avatar = move || auth.get().user.and_then(|u| u.profile_image);

    view! {
        <section class="my-page">
            <h1>"My Page"</h1>
            <Show when=move || avatar().is_some()>
                <img class="my-page__avatar" src=move || avatar().unwrap_or_default() alt="Profile image"/>
            </Show>
            <p class="my-page__email">{move || auth.get().user.map(|u| u.email).unwrap_or_default()}</p>
            <form class="my-page__form" on:submit=on_save>
                <input
                    placeholder="Nickname"
                    prop:value=move || form.get().nickname
                    on:input=move |ev| form.update(|f| f.nickname = event_target_value(&ev))
                />
                <input
                    type="tel"
                    placeholder="Phone"
                    prop:value=move || form.get().phone
                    on:input=move |ev| form.update(|f| f.phone = event_target_value(&ev))
                />
                <input
                    placeholder="Post code"
                    prop:value=move || form.get().post_code
                    on:input=move |ev| form.update(|f| f.post_code = event_target_value(&ev))
                />
                <input
                    placeholder="Address"
                    prop:value=move || form.get().address
                    on:input=move |ev| form.update(|f| f.address = event_target_value(&ev))
                />
                <input
                    placeholder="Address detail"
                    prop:value=move || form.get().address_detail
                    on:input=move |ev| form.update(|f| f.address_detail = event_target_value(&ev))
                />
                <label class="my-page__image">
                    "Profile image "
                    <input type="file" accept="image/*" on:change=on_pick_image/>
                </label>
                <button type="submit" disabled=move || busy.get()>
                    "Save"
                </button>
            </form>
            <Show when=move || message().is_some()>
                <p class="my-page__message">{move || message().unwrap_or_default()}</p>
            </Show>
            <button class="my-page__delete" on:click=on_delete>
                "Delete account"
            </button>
        </section>
    }
}
