use super::*;
use crate::net::http::MultipartPart;

// =============================================================
// UserProfile
// =============================================================

#[test]
fn user_profile_parses_server_payload() {
    let raw = r#"{
        "userId": 7,
        "email": "a@b.com",
        "nickname": "n",
        "profileImage": "/uploads/p.png",
        "role": "USER",
        "password": null,
        "createdAt": "2025-05-01T10:00:00"
    }"#;
    let user: UserProfile = serde_json::from_str(raw).unwrap();
    assert_eq!(user.user_id, 7);
    assert_eq!(user.profile_image.as_deref(), Some("/uploads/p.png"));
    assert_eq!(user.role.as_deref(), Some("USER"));
    assert!(user.phone.is_none());
}

#[test]
fn user_profile_accepts_string_id() {
    let user: UserProfile = serde_json::from_str(r#"{"userId":"12","email":"x@y.z","nickname":"k"}"#).unwrap();
    assert_eq!(user.user_id, 12);
}

#[test]
fn user_profile_rejects_missing_or_bad_id() {
    assert!(serde_json::from_str::<UserProfile>(r#"{"email":"x@y.z"}"#).is_err());
    assert!(serde_json::from_str::<UserProfile>(r#"{"userId":"abc"}"#).is_err());
    assert!(serde_json::from_str::<UserProfile>(r#"{"userId":-1}"#).is_err());
}

#[test]
fn user_profile_serializes_camel_case_without_nulls() {
    let user = UserProfile { user_id: 1, nickname: "n".to_owned(), ..UserProfile::default() };
    let value = serde_json::to_value(&user).unwrap();
    assert_eq!(value, serde_json::json!({ "userId": 1, "email": "", "nickname": "n" }));
}

// =============================================================
// Login
// =============================================================

#[test]
fn login_request_trims_email_and_keeps_password() {
    let req = LoginRequest::new("  a@b.com ", " secret1! ").unwrap();
    assert_eq!(req.email, "a@b.com");
    assert_eq!(req.password, " secret1! ");
}

#[test]
fn login_request_requires_both_fields() {
    assert!(matches!(LoginRequest::new("", "pw"), Err(ApiError::Validation(_))));
    assert!(matches!(LoginRequest::new("a@b.com", ""), Err(ApiError::Validation(_))));
    assert!(matches!(LoginRequest::new("not-an-email", "pw"), Err(ApiError::Validation(_))));
}

#[test]
fn login_response_splits_token_from_profile() {
    let raw = r#"{"token":"t1","userId":1,"nickname":"n","email":"a@b.com","role":"USER"}"#;
    let resp: LoginResponse = serde_json::from_str(raw).unwrap();
    assert_eq!(resp.token, "t1");
    assert_eq!(resp.user.user_id, 1);
    assert_eq!(resp.user.nickname, "n");
}

#[test]
fn login_response_without_token_is_rejected() {
    assert!(serde_json::from_str::<LoginResponse>(r#"{"userId":1}"#).is_err());
}

#[test]
fn email_shape_checks() {
    assert!(is_email_shaped("a@b.com"));
    assert!(is_email_shaped("first.last@sub.example.kr"));
    assert!(!is_email_shaped("a@b"));
    assert!(!is_email_shaped("@b.com"));
    assert!(!is_email_shaped("a@@b.com"));
    assert!(!is_email_shaped("a b@c.com"));
    assert!(!is_email_shaped("a@b..com"));
}

// =============================================================
// Profile update
// =============================================================

#[test]
fn profile_update_json_skips_unset_fields() {
    let update = ProfileUpdate { nickname: Some("n2".to_owned()), ..ProfileUpdate::default() };
    assert_eq!(serde_json::to_value(&update).unwrap(), serde_json::json!({ "nickname": "n2" }));
}

#[test]
fn profile_update_multipart_includes_fields_and_image() {
    let update = ProfileUpdate {
        nickname: Some("n2".to_owned()),
        post_code: Some("04524".to_owned()),
        ..ProfileUpdate::default()
    };
    let image = FileUpload { file_name: "me.png".to_owned(), mime: "image/png".to_owned(), bytes: vec![1, 2, 3] };
    let form = update.to_multipart(Some(&image));
    assert_eq!(
        form.parts(),
        &[
            MultipartPart::Text { name: "nickname".to_owned(), value: "n2".to_owned() },
            MultipartPart::Text { name: "postCode".to_owned(), value: "04524".to_owned() },
            MultipartPart::File { name: "profileImage".to_owned(), file: image },
        ]
    );
}

// =============================================================
// OAuth callback
// =============================================================

#[test]
fn oauth_params_decode_query() {
    let params = OAuthCallbackParams::from_query("?token=abc&userId=5&email=a%40b.com&nickname=%ED%99%8D%EA%B8%B8%EB%8F%99");
    assert_eq!(params.token.as_deref(), Some("abc"));
    assert_eq!(params.email.as_deref(), Some("a@b.com"));
    assert_eq!(params.nickname.as_deref(), Some("홍길동"));

    let (token, user) = params.into_credentials().unwrap();
    assert_eq!(token, "abc");
    assert_eq!(user.user_id, 5);
    assert_eq!(user.email, "a@b.com");
}

#[test]
fn oauth_params_without_token_fail_validation() {
    let err = OAuthCallbackParams::from_query("userId=5").into_credentials().unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[test]
fn oauth_params_with_bad_user_id_fail_validation() {
    let err = OAuthCallbackParams::from_query("token=t&userId=abc").into_credentials().unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

// =============================================================
// Errors + feature payloads
// =============================================================

#[test]
fn error_body_prefers_message_then_error() {
    assert_eq!(ErrorBody::message_from(r#"{"message":"bad password"}"#).as_deref(), Some("bad password"));
    assert_eq!(ErrorBody::message_from(r#"{"error":"limit reached"}"#).as_deref(), Some("limit reached"));
    assert_eq!(ErrorBody::message_from(r#"{"message":"  ","error":"e"}"#).as_deref(), Some("e"));
    assert_eq!(ErrorBody::message_from("<html>"), None);
    assert_eq!(ErrorBody::message_from(""), None);
}

#[test]
fn like_state_accepts_bean_style_name() {
    let state: LikeState = serde_json::from_str(r#"{"success":true,"likeCount":3,"liked":true}"#).unwrap();
    assert!(state.is_liked);
    let state: LikeState = serde_json::from_str(r#"{"success":true,"likeCount":2,"isLiked":false}"#).unwrap();
    assert!(!state.is_liked);
    assert_eq!(state.like_count, 2);
}

#[test]
fn post_page_parses_cursor_fields() {
    let raw = r#"{
        "posts": [{
            "workoutPost": {"postId": 9, "userId": 1, "title": "run", "likeCount": 4},
            "authorName": "n",
            "likedByUser": true
        }],
        "hasNext": true,
        "lastPostId": 9
    }"#;
    let page: WorkoutPostPage = serde_json::from_str(raw).unwrap();
    assert_eq!(page.posts.len(), 1);
    assert_eq!(page.posts[0].workout_post.like_count, 4);
    assert!(page.posts[0].liked_by_user);
    assert!(page.has_next);
    assert_eq!(page.last_post_id, Some(9));
}

#[test]
fn todo_toggle_flips_completion() {
    let todo = Todo {
        todo_id: 3,
        user_id: 1,
        content: "read".to_owned(),
        is_completed: false,
        completed_at: None,
        created_at: None,
    };
    let update = TodoStatusUpdate::toggled(&todo);
    assert!(update.is_completed);
    assert_eq!(
        serde_json::to_value(&update).unwrap(),
        serde_json::json!({ "todoId": 3, "userId": 1, "content": "read", "isCompleted": true })
    );
}
