//! Wire DTOs for the remote REST API.
//!
//! DESIGN
//! ======
//! Every endpoint gets an explicit request/response type so payloads are
//! validated once, at the HTTP boundary, instead of being destructured ad hoc
//! at each call site. The server speaks camelCase JSON.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use super::error::ApiError;
use super::http::MultipartForm;
use crate::util::query::parse_query;

// =============================================================================
// USERS + AUTH
// =============================================================================

/// Profile snapshot of the signed-in user.
///
/// Mirrors the `user` entry in the credential store, so everything beyond the
/// id is optional: OAuth callbacks only carry id, email and nickname.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(deserialize_with = "deserialize_id")]
    pub user_id: u64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_code: Option<String>,
}

/// `POST /auth/login` body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    /// Validate raw form input. Email is trimmed; the password is kept verbatim.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` when the email is not email-shaped or
    /// the password is empty.
    pub fn new(email: &str, password: &str) -> Result<Self, ApiError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ApiError::Validation("Enter your email.".to_owned()));
        }
        if !is_email_shaped(email) {
            return Err(ApiError::Validation("Enter a valid email address.".to_owned()));
        }
        if password.is_empty() {
            return Err(ApiError::Validation("Enter your password.".to_owned()));
        }
        Ok(Self { email: email.to_owned(), password: password.to_owned() })
    }
}

/// `POST /auth/login` response: the bearer token plus the profile fields.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(flatten)]
    pub user: UserProfile,
}

/// `POST /auth/signup` body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub nickname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

impl SignupRequest {
    /// # Errors
    ///
    /// Returns `ApiError::Validation` when the credential fields are missing.
    pub fn validate(&self) -> Result<(), ApiError> {
        LoginRequest::new(&self.email, &self.password).map(|_| ())
    }
}

/// Editable profile fields for `PUT /users/me`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_code: Option<String>,
}

impl ProfileUpdate {
    /// Encode as form fields, attaching `image` as the `profileImage` file part.
    #[must_use]
    pub fn to_multipart(&self, image: Option<&FileUpload>) -> MultipartForm {
        let fields = [
            ("nickname", &self.nickname),
            ("phone", &self.phone),
            ("address", &self.address),
            ("addressDetail", &self.address_detail),
            ("postCode", &self.post_code),
        ];
        let mut form = MultipartForm::new();
        for (name, value) in fields {
            if let Some(value) = value {
                form = form.text(name, value);
            }
        }
        if let Some(image) = image {
            form = form.file("profileImage", image.clone());
        }
        form
    }
}

/// A file picked by the user, read into memory for upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Query parameters delivered to the OAuth callback route.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OAuthCallbackParams {
    pub token: Option<String>,
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub nickname: Option<String>,
}

impl OAuthCallbackParams {
    /// Parse a raw query string (with or without the leading `?`).
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in parse_query(query) {
            match key.as_str() {
                "token" => params.token = Some(value),
                "userId" => params.user_id = Some(value),
                "email" => params.email = Some(value),
                "nickname" => params.nickname = Some(value),
                _ => {}
            }
        }
        params
    }

    /// Convert into the token/profile pair a direct login would produce.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` when the token is missing or the user id
    /// is not numeric.
    pub fn into_credentials(self) -> Result<(String, UserProfile), ApiError> {
        let token = self
            .token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ApiError::Validation("Sign-in response is missing credentials.".to_owned()))?;
        let user_id = self
            .user_id
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .ok_or_else(|| ApiError::Validation("Sign-in response has an invalid user id.".to_owned()))?;
        let user = UserProfile {
            user_id,
            email: self.email.unwrap_or_default(),
            nickname: self.nickname.unwrap_or_default(),
            ..UserProfile::default()
        };
        Ok((token, user))
    }
}

/// Error payload. Most endpoints use `message`; some use `error`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Extract a non-blank server message from a raw response body.
    #[must_use]
    pub fn message_from(body: &str) -> Option<String> {
        let parsed: Self = serde_json::from_str(body).ok()?;
        parsed
            .message
            .into_iter()
            .chain(parsed.error)
            .map(|m| m.trim().to_owned())
            .find(|m| !m.is_empty())
    }
}

// =============================================================================
// TODOS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub todo_id: u64,
    pub user_id: u64,
    pub content: String,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TodoEnvelope {
    pub todolist: Todo,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTodo {
    pub user_id: u64,
    pub content: String,
    pub is_completed: bool,
}

/// Body for `PUT /todo/status/{id}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoStatusUpdate {
    pub todo_id: u64,
    pub user_id: u64,
    pub content: String,
    pub is_completed: bool,
}

impl TodoStatusUpdate {
    /// Status update that flips completion of `todo`.
    #[must_use]
    pub fn toggled(todo: &Todo) -> Self {
        Self {
            todo_id: todo.todo_id,
            user_id: todo.user_id,
            content: todo.content.clone(),
            is_completed: !todo.is_completed,
        }
    }
}

// =============================================================================
// MEMOS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memo {
    pub memo_id: u64,
    pub user_id: u64,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MemoEnvelope {
    pub memo: Memo,
}

/// Body for memo create and update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoDraft {
    pub user_id: u64,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

// =============================================================================
// STUDY + WORKOUT RECORDS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyRecord {
    pub record_id: u64,
    pub user_id: u64,
    pub subject: String,
    /// Minutes studied.
    pub duration: u32,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyRecordEnvelope {
    pub study_record: StudyRecord,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudyRecord {
    pub user_id: u64,
    pub subject: String,
    pub duration: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRecord {
    pub record_id: u64,
    pub user_id: u64,
    pub workout_type: String,
    /// Minutes exercised.
    pub duration: u32,
    #[serde(default)]
    pub calories: u32,
    #[serde(default)]
    pub workout_date: Option<String>,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRecordEnvelope {
    pub workout_record: WorkoutRecord,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkoutRecord {
    pub user_id: u64,
    pub workout_type: String,
    pub duration: u32,
    pub calories: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workout_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

// =============================================================================
// WORKOUT POSTS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPost {
    pub post_id: u64,
    pub user_id: u64,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub workout_category: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub view_count: u32,
    #[serde(default)]
    pub like_count: u32,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// A feed entry: the post plus viewer-relative decoration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPostEntry {
    pub workout_post: WorkoutPost,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub liked_by_user: bool,
}

/// One cursor page of the feed. Pass `last_post_id` back to fetch the next page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPostPage {
    #[serde(default)]
    pub posts: Vec<WorkoutPostEntry>,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub last_post_id: Option<u64>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub total_items: u32,
}

/// The `post` JSON part of a create/update multipart request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPostDraft {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workout_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    pub post_id: u64,
}

/// Like toggle/status response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeState {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub like_count: u32,
    #[serde(default, alias = "liked")]
    pub is_liked: bool,
}

// =============================================================================
// HELPERS
// =============================================================================

/// Loose email shape check: `local@domain.tld` with no whitespace.
#[must_use]
pub fn is_email_shaped(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain.split('.').count() >= 2
        && domain.split('.').all(|label| !label.is_empty())
}

/// Accept ids as JSON numbers or numeric strings. Profiles cached from an
/// OAuth callback historically stored the id as a string.
fn deserialize_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Number(number) => number
            .as_u64()
            .ok_or_else(|| D::Error::custom("expected non-negative integer id")),
        serde_json::Value::String(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| D::Error::custom("expected numeric id string")),
        _ => Err(D::Error::custom("expected id")),
    }
}
