//! REST endpoint functions for the remote API.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each function maps one endpoint onto typed request/response DTOs and goes
//! through [`ApiClient`], so token injection and 401 handling apply
//! uniformly. Path builders are plain functions so they can be tested without
//! a transport.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::error::ApiError;
use super::http::{ApiClient, ApiRequest, MultipartForm};
use super::types::{
    FileUpload, LikeRequest, LikeState, LoginRequest, LoginResponse, Memo, MemoDraft, MemoEnvelope, NewStudyRecord,
    NewTodo, NewWorkoutRecord, ProfileUpdate, SignupRequest, StudyRecord, StudyRecordEnvelope, Todo, TodoEnvelope,
    TodoStatusUpdate, UserProfile, WorkoutPostDraft, WorkoutPostEntry, WorkoutPostPage, WorkoutRecord,
    WorkoutRecordEnvelope,
};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

fn require_id(id: u64, what: &str) -> Result<u64, ApiError> {
    if id == 0 {
        return Err(ApiError::Validation(format!("A valid {what} id is required.")));
    }
    Ok(id)
}

fn todo_status_path(todo_id: u64) -> String {
    format!("/todo/status/{todo_id}")
}

fn memo_update_path(memo_id: u64) -> String {
    format!("/memo/update/{memo_id}")
}

fn record_path(kind: &str, id: u64) -> String {
    format!("/{kind}/{id}")
}

fn record_detail_path(kind: &str, id: u64) -> String {
    format!("/{kind}/detail/{id}")
}

// =============================================================================
// AUTH + USERS
// =============================================================================

/// `POST /auth/login`.
///
/// # Errors
///
/// Propagates HTTP layer errors; `Decode` when the response lacks a token.
pub async fn login(api: &ApiClient, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
    api.send_json(ApiRequest::post("/auth/login").json(request)?).await
}

/// `POST /auth/signup`. The response body is parsed leniently and any token
/// in it is ignored.
///
/// # Errors
///
/// Propagates HTTP layer errors.
pub async fn signup(api: &ApiClient, request: &SignupRequest) -> Result<Option<UserProfile>, ApiError> {
    let response = api.send(ApiRequest::post("/auth/signup").json(request)?).await?;
    Ok(serde_json::from_str(&response.body).ok())
}

/// `GET /users/me`.
///
/// # Errors
///
/// Propagates HTTP layer errors.
pub async fn fetch_me(api: &ApiClient) -> Result<UserProfile, ApiError> {
    api.send_json(ApiRequest::get("/users/me")).await
}

/// `PUT /users/me` with a JSON body.
///
/// # Errors
///
/// Propagates HTTP layer errors.
pub async fn update_me(api: &ApiClient, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
    api.send_json(ApiRequest::put("/users/me").json(update)?).await
}

/// `PUT /users/me` as multipart, used when a new profile image is attached.
///
/// # Errors
///
/// Propagates HTTP layer errors.
pub async fn update_me_multipart(
    api: &ApiClient,
    update: &ProfileUpdate,
    image: &FileUpload,
) -> Result<UserProfile, ApiError> {
    api.send_json(ApiRequest::put("/users/me").multipart(update.to_multipart(Some(image))))
        .await
}

/// `DELETE /users/me`.
///
/// # Errors
///
/// Propagates HTTP layer errors.
pub async fn delete_me(api: &ApiClient) -> Result<(), ApiError> {
    api.send_empty(ApiRequest::delete("/users/me")).await
}

// =============================================================================
// TODOS
// =============================================================================

/// # Errors
///
/// `Validation` for a zero user id; otherwise HTTP layer errors.
pub async fn list_todos(api: &ApiClient, user_id: u64) -> Result<Vec<Todo>, ApiError> {
    let user_id = require_id(user_id, "user")?;
    api.send_json(ApiRequest::get(record_path("todo", user_id))).await
}

/// # Errors
///
/// `Validation` for blank content; otherwise HTTP layer errors.
pub async fn create_todo(api: &ApiClient, todo: &NewTodo) -> Result<Todo, ApiError> {
    if todo.content.trim().is_empty() {
        return Err(ApiError::Validation("Enter something to do.".to_owned()));
    }
    let envelope: TodoEnvelope = api.send_json(ApiRequest::post("/todo/save").json(todo)?).await?;
    Ok(envelope.todolist)
}

/// # Errors
///
/// `Validation` for a zero id; otherwise HTTP layer errors.
pub async fn update_todo_status(api: &ApiClient, update: &TodoStatusUpdate) -> Result<(), ApiError> {
    let todo_id = require_id(update.todo_id, "to-do")?;
    api.send_empty(ApiRequest::put(todo_status_path(todo_id)).json(update)?)
        .await
}

/// # Errors
///
/// `Validation` for a zero id; otherwise HTTP layer errors.
pub async fn delete_todo(api: &ApiClient, todo_id: u64) -> Result<(), ApiError> {
    let todo_id = require_id(todo_id, "to-do")?;
    api.send_empty(ApiRequest::delete(record_path("todo", todo_id))).await
}

// =============================================================================
// MEMOS
// =============================================================================

/// # Errors
///
/// `Validation` for a zero user id; otherwise HTTP layer errors.
pub async fn list_memos(api: &ApiClient, user_id: u64) -> Result<Vec<Memo>, ApiError> {
    let user_id = require_id(user_id, "user")?;
    let envelopes: Vec<MemoEnvelope> = api.send_json(ApiRequest::get(record_path("memo", user_id))).await?;
    Ok(envelopes.into_iter().map(|e| e.memo).collect())
}

/// # Errors
///
/// `Validation` for a blank title; `Domain` when the server's memo limit is hit.
pub async fn create_memo(api: &ApiClient, draft: &MemoDraft) -> Result<Memo, ApiError> {
    if draft.title.trim().is_empty() {
        return Err(ApiError::Validation("Enter a title.".to_owned()));
    }
    let envelope: MemoEnvelope = api.send_json(ApiRequest::post("/memo/save").json(draft)?).await?;
    Ok(envelope.memo)
}

/// # Errors
///
/// `Validation` for a zero id or blank title; otherwise HTTP layer errors.
pub async fn update_memo(api: &ApiClient, memo_id: u64, draft: &MemoDraft) -> Result<Memo, ApiError> {
    let memo_id = require_id(memo_id, "memo")?;
    if draft.title.trim().is_empty() {
        return Err(ApiError::Validation("Enter a title.".to_owned()));
    }
    let envelope: MemoEnvelope = api.send_json(ApiRequest::put(memo_update_path(memo_id)).json(draft)?).await?;
    Ok(envelope.memo)
}

/// # Errors
///
/// `Validation` for a zero id; otherwise HTTP layer errors.
pub async fn delete_memo(api: &ApiClient, memo_id: u64) -> Result<(), ApiError> {
    let memo_id = require_id(memo_id, "memo")?;
    api.send_empty(ApiRequest::delete(record_path("memo", memo_id))).await
}

// =============================================================================
// STUDY RECORDS
// =============================================================================

/// # Errors
///
/// `Validation` for a blank subject; otherwise HTTP layer errors.
pub async fn create_study_record(api: &ApiClient, record: &NewStudyRecord) -> Result<StudyRecord, ApiError> {
    if record.subject.trim().is_empty() {
        return Err(ApiError::Validation("Enter a subject.".to_owned()));
    }
    let envelope: StudyRecordEnvelope = api
        .send_json(ApiRequest::post("/studyrecord/save").json(record)?)
        .await?;
    Ok(envelope.study_record)
}

/// # Errors
///
/// `Validation` for a zero user id; otherwise HTTP layer errors.
pub async fn list_study_records(api: &ApiClient, user_id: u64) -> Result<Vec<StudyRecord>, ApiError> {
    let user_id = require_id(user_id, "user")?;
    let envelopes: Vec<StudyRecordEnvelope> = api
        .send_json(ApiRequest::get(record_path("studyrecord", user_id)))
        .await?;
    Ok(envelopes.into_iter().map(|e| e.study_record).collect())
}

/// # Errors
///
/// `Validation` for a zero id; otherwise HTTP layer errors.
pub async fn delete_study_record(api: &ApiClient, record_id: u64) -> Result<(), ApiError> {
    let record_id = require_id(record_id, "record")?;
    api.send_empty(ApiRequest::delete(record_path("studyrecord", record_id)))
        .await
}

// =============================================================================
// WORKOUT RECORDS
// =============================================================================

/// # Errors
///
/// `Validation` for a blank workout type; otherwise HTTP layer errors.
pub async fn create_workout_record(api: &ApiClient, record: &NewWorkoutRecord) -> Result<WorkoutRecord, ApiError> {
    if record.workout_type.trim().is_empty() {
        return Err(ApiError::Validation("Choose a workout type.".to_owned()));
    }
    let envelope: WorkoutRecordEnvelope = api
        .send_json(ApiRequest::post("/workoutrecord/save").json(record)?)
        .await?;
    Ok(envelope.workout_record)
}

/// # Errors
///
/// `Validation` for a zero user id; otherwise HTTP layer errors.
pub async fn list_workout_records(api: &ApiClient, user_id: u64) -> Result<Vec<WorkoutRecord>, ApiError> {
    let user_id = require_id(user_id, "user")?;
    let envelopes: Vec<WorkoutRecordEnvelope> = api
        .send_json(ApiRequest::get(record_path("workoutrecord", user_id)))
        .await?;
    Ok(envelopes.into_iter().map(|e| e.workout_record).collect())
}

/// # Errors
///
/// `Validation` for a zero id; otherwise HTTP layer errors.
pub async fn delete_workout_record(api: &ApiClient, record_id: u64) -> Result<(), ApiError> {
    let record_id = require_id(record_id, "record")?;
    api.send_empty(ApiRequest::delete(record_path("workoutrecord", record_id)))
        .await
}

// =============================================================================
// WORKOUT POSTS
// =============================================================================

/// Which slice of the feed to page through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PostFeed {
    /// Newest first, optionally narrowed to one workout category.
    All { category: Option<String> },
    /// Most liked first.
    Popular,
    /// Posts written by one user.
    ByUser(u64),
}

fn feed_request(feed: &PostFeed, last_post_id: Option<u64>, size: u32) -> Result<ApiRequest, ApiError> {
    let request = match feed {
        PostFeed::All { category } => ApiRequest::get("/workoutpost/list")
            .query("size", size)
            .query_opt("lastPostId", last_post_id)
            .query_opt("category", category.as_deref().filter(|c| !c.is_empty())),
        PostFeed::Popular => ApiRequest::get("/workoutpost/popular")
            .query("size", size)
            .query_opt("lastPostId", last_post_id),
        PostFeed::ByUser(user_id) => {
            let user_id = require_id(*user_id, "user")?;
            ApiRequest::get(format!("/workoutpost/user/{user_id}"))
                .query("size", size)
                .query_opt("lastPostId", last_post_id)
        }
    };
    Ok(request)
}

fn post_form(draft: &WorkoutPostDraft, image: Option<&FileUpload>) -> Result<MultipartForm, ApiError> {
    let form = MultipartForm::new().json("post", draft)?;
    Ok(match image {
        Some(image) => form.file("file", image.clone()),
        None => form,
    })
}

/// Fetch one page of `feed` after `last_post_id`.
///
/// # Errors
///
/// Propagates HTTP layer errors.
pub async fn list_posts(
    api: &ApiClient,
    feed: &PostFeed,
    last_post_id: Option<u64>,
    size: u32,
) -> Result<WorkoutPostPage, ApiError> {
    api.send_json(feed_request(feed, last_post_id, size)?).await
}

/// # Errors
///
/// `Validation` for a zero id; otherwise HTTP layer errors.
pub async fn get_post(api: &ApiClient, post_id: u64) -> Result<WorkoutPostEntry, ApiError> {
    let post_id = require_id(post_id, "post")?;
    api.send_json(ApiRequest::get(record_detail_path("workoutpost", post_id)))
        .await
}

/// Multipart create: a `post` JSON part and an optional `file` image part.
///
/// # Errors
///
/// `Validation` for a blank title; otherwise HTTP layer errors.
pub async fn create_post(
    api: &ApiClient,
    draft: &WorkoutPostDraft,
    image: Option<&FileUpload>,
) -> Result<WorkoutPostEntry, ApiError> {
    if draft.title.trim().is_empty() {
        return Err(ApiError::Validation("Enter a title.".to_owned()));
    }
    api.send_json(ApiRequest::post("/workoutpost/save").multipart(post_form(draft, image)?))
        .await
}

/// # Errors
///
/// `Validation` for a zero id or blank title; otherwise HTTP layer errors.
pub async fn update_post(
    api: &ApiClient,
    post_id: u64,
    draft: &WorkoutPostDraft,
    image: Option<&FileUpload>,
) -> Result<WorkoutPostEntry, ApiError> {
    let post_id = require_id(post_id, "post")?;
    if draft.title.trim().is_empty() {
        return Err(ApiError::Validation("Enter a title.".to_owned()));
    }
    api.send_json(ApiRequest::put(format!("/workoutpost/update/{post_id}")).multipart(post_form(draft, image)?))
        .await
}

/// # Errors
///
/// `Validation` for a zero id; otherwise HTTP layer errors.
pub async fn delete_post(api: &ApiClient, post_id: u64) -> Result<(), ApiError> {
    let post_id = require_id(post_id, "post")?;
    api.send_empty(ApiRequest::delete(record_path("workoutpost", post_id)))
        .await
}

/// Like or unlike a post.
///
/// # Errors
///
/// `Validation` for a zero id; otherwise HTTP layer errors.
pub async fn toggle_like(api: &ApiClient, post_id: u64) -> Result<LikeState, ApiError> {
    let post_id = require_id(post_id, "post")?;
    api.send_json(ApiRequest::post("/post-likes").json(&LikeRequest { post_id })?)
        .await
}

/// # Errors
///
/// `Validation` for a zero id; otherwise HTTP layer errors.
pub async fn like_status(api: &ApiClient, post_id: u64) -> Result<LikeState, ApiError> {
    let post_id = require_id(post_id, "post")?;
    api.send_json(ApiRequest::get(format!("/post-likes/status/{post_id}")))
        .await
}
