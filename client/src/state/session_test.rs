use std::cell::RefCell;

use futures::executor::{LocalPool, block_on};
use futures::task::LocalSpawnExt;

use super::*;
use crate::net::http::RawResponse;
use crate::net::types::OAuthCallbackParams;
use crate::state::auth::SessionPhase;
use crate::state::credentials::{TOKEN_KEY, USER_KEY};
use crate::test_support::{Harness, sample_user};
use crate::util::storage::KeyValueStore;

type TestSession = SessionController<Rc<RefCell<AuthState>>>;

fn controller(h: &Harness) -> TestSession {
    SessionController::new(Rc::new(h.api.clone()), Rc::new(RefCell::new(AuthState::default())))
}

fn signed_in_controller(h: &Harness) -> TestSession {
    let session = controller(h);
    session.process_oauth_login("t1", sample_user(1)).unwrap();
    session
}

fn user_json(user: &UserProfile) -> String {
    serde_json::to_string(user).unwrap()
}

fn login_body(token: &str, user_id: u64) -> String {
    format!(r#"{{"token":"{token}","userId":{user_id},"email":"user{user_id}@mindset.test","nickname":"user{user_id}"}}"#)
}

fn ok(body: &str) -> Result<RawResponse, ApiError> {
    Ok(RawResponse { status: 200, body: body.to_owned() })
}

// =============================================================
// Login
// =============================================================

#[test]
fn login_persists_credentials_and_authenticates() {
    let h = Harness::new();
    let session = controller(&h);
    h.transport.reply(200, &login_body("t1", 1));

    let user = block_on(session.login("user1@mindset.test", "pw")).unwrap();

    assert_eq!(user.user_id, 1);
    assert_eq!(h.storage.get(TOKEN_KEY).as_deref(), Some("t1"));
    assert_eq!(h.api.credentials().load().unwrap().user, user);
    let state = session.snapshot();
    assert_eq!(state.phase(), SessionPhase::Authenticated);
    assert_eq!(state.error, None);
}

#[test]
fn login_with_partial_profile_response() {
    let h = Harness::new();
    let session = controller(&h);
    h.transport.reply(200, r#"{"token":"t1","userId":1,"nickname":"n"}"#);

    block_on(session.login("a@b.com", "secret1!")).unwrap();

    let stored = h.api.credentials().load().unwrap();
    assert_eq!(stored.token, "t1");
    assert_eq!(stored.user.user_id, 1);
    assert_eq!(stored.user.nickname, "n");
    assert_eq!(session.snapshot().phase(), SessionPhase::Authenticated);
}

#[test]
fn login_sends_trimmed_email_without_authorization() {
    let h = Harness::new();
    let session = controller(&h);
    h.transport.reply(200, &login_body("t1", 1));

    block_on(session.login("  user1@mindset.test ", "pw")).unwrap();

    let sent = h.transport.last_sent();
    assert!(sent.url.ends_with("/api/auth/login"));
    assert_eq!(sent.header("Authorization"), None);
    let crate::net::http::RequestBody::Json(body) = sent.body else {
        panic!("expected json body");
    };
    assert!(body.contains(r#""email":"user1@mindset.test""#));
}

#[test]
fn login_validation_never_reaches_network() {
    let h = Harness::new();
    let session = controller(&h);

    let err = block_on(session.login("user1@mindset.test", "")).unwrap_err();

    assert!(matches!(err, ApiError::Validation(_)));
    assert!(h.transport.sent().is_empty());
    assert_eq!(session.snapshot().error.as_deref(), Some("Enter your password."));
}

#[test]
fn login_rejection_surfaces_server_message_without_redirect() {
    let h = Harness::new();
    let session = controller(&h);
    h.transport.reply(401, r#"{"message":"Invalid credentials"}"#);

    let err = block_on(session.login("user1@mindset.test", "wrong")).unwrap_err();

    assert!(err.is_authentication());
    assert_eq!(session.snapshot().error.as_deref(), Some("Invalid credentials"));
    assert!(h.navigator.visits().is_empty());
    assert!(h.storage.is_empty());
}

#[test]
fn login_failure_without_message_uses_fallback() {
    let h = Harness::new();
    let session = controller(&h);
    h.transport.reply(500, "");

    block_on(session.login("user1@mindset.test", "pw")).unwrap_err();

    assert_eq!(session.snapshot().error.as_deref(), Some(LOGIN_FAILED));
}

#[test]
fn next_operation_clears_previous_error() {
    let h = Harness::new();
    let session = controller(&h);
    h.transport.reply(500, "");
    h.transport.reply(200, &login_body("t1", 1));

    block_on(session.login("user1@mindset.test", "pw")).unwrap_err();
    assert!(session.snapshot().error.is_some());
    block_on(session.login("user1@mindset.test", "pw")).unwrap();

    assert_eq!(session.snapshot().error, None);
}

// =============================================================
// Signup
// =============================================================

#[test]
fn signup_never_stores_a_token() {
    let h = Harness::new();
    let session = controller(&h);
    h.transport.reply(200, &login_body("leaked", 3));
    let request = SignupRequest {
        email: "user3@mindset.test".into(),
        password: "pw".into(),
        nickname: "user3".into(),
        ..SignupRequest::default()
    };

    let created = block_on(session.signup(&request)).unwrap();

    assert_eq!(created.map(|u| u.user_id), Some(3));
    assert!(h.storage.is_empty());
    assert!(session.snapshot().user.is_none());
}

#[test]
fn signup_conflict_keeps_server_message() {
    let h = Harness::new();
    let session = controller(&h);
    h.transport.reply(409, r#"{"error":"Email already registered"}"#);
    let request = SignupRequest { email: "a@b.co".into(), password: "pw".into(), ..SignupRequest::default() };

    let err = block_on(session.signup(&request)).unwrap_err();

    assert_eq!(err, ApiError::Domain { status: 409, message: Some("Email already registered".into()) });
    assert_eq!(session.snapshot().error.as_deref(), Some("Email already registered"));
}

// =============================================================
// Startup reconciliation
// =============================================================

#[test]
fn init_without_credentials_settles_anonymous_offline() {
    let h = Harness::new();
    let session = controller(&h);
    assert_eq!(session.snapshot().phase(), SessionPhase::Resolving);

    block_on(session.init());

    assert_eq!(session.snapshot().phase(), SessionPhase::Anonymous);
    assert!(h.transport.sent().is_empty());
}

#[test]
fn init_discards_half_written_pair() {
    let h = Harness::new();
    h.storage.set(TOKEN_KEY, "orphan").unwrap();
    let session = controller(&h);

    block_on(session.init());

    assert!(h.storage.is_empty());
    assert_eq!(session.snapshot().phase(), SessionPhase::Anonymous);
}

#[test]
fn init_refreshes_cached_profile() {
    let h = Harness::signed_in("t1", &sample_user(1));
    let session = controller(&h);
    let fresh = UserProfile { nickname: "renamed".into(), ..sample_user(1) };
    h.transport.reply(200, &user_json(&fresh));

    block_on(session.init());

    assert_eq!(h.transport.last_sent().header("Authorization"), Some("Bearer t1"));
    assert_eq!(session.snapshot().user.as_ref(), Some(&fresh));
    let stored = h.api.credentials().load().unwrap();
    assert_eq!(stored.token, "t1");
    assert_eq!(stored.user, fresh);
}

#[test]
fn init_with_expired_token_forces_logout() {
    let h = Harness::signed_in("stale", &sample_user(1));
    let session = controller(&h);
    h.transport.reply(401, "");

    block_on(session.init());

    assert!(h.storage.get(TOKEN_KEY).is_none());
    assert!(h.storage.get(USER_KEY).is_none());
    assert_eq!(h.navigator.visits(), vec!["/login".to_owned()]);
    assert_eq!(session.snapshot().phase(), SessionPhase::Anonymous);
}

#[test]
fn init_network_failure_signs_out_locally() {
    let h = Harness::signed_in("t1", &sample_user(1));
    let session = controller(&h);
    h.transport.fail("offline");

    block_on(session.init());

    assert!(h.storage.is_empty());
    assert!(h.navigator.visits().is_empty());
    assert_eq!(session.snapshot().phase(), SessionPhase::Anonymous);
}

#[test]
fn late_verification_does_not_undo_logout() {
    let h = Harness::signed_in("t1", &sample_user(1));
    let session = controller(&h);
    let reply = h.transport.reply_later();
    let mut pool = LocalPool::new();
    let pending = session.clone();
    pool.spawner().spawn_local(async move { pending.init().await }).unwrap();
    pool.run_until_stalled();
    assert_eq!(session.snapshot().phase(), SessionPhase::Authenticated);

    session.logout();
    assert!(reply.send(ok(&user_json(&sample_user(1)))).is_ok());
    pool.run();

    assert!(h.storage.is_empty());
    assert_eq!(session.snapshot().phase(), SessionPhase::Anonymous);
}

#[test]
fn late_verification_does_not_replace_newer_login() {
    let h = Harness::signed_in("t1", &sample_user(1));
    let session = controller(&h);
    let reply = h.transport.reply_later();
    h.transport.reply(200, &login_body("t2", 2));
    let mut pool = LocalPool::new();
    let pending = session.clone();
    pool.spawner().spawn_local(async move { pending.init().await }).unwrap();
    pool.run_until_stalled();

    block_on(session.login("user2@mindset.test", "pw")).unwrap();
    assert!(reply.send(ok(&user_json(&sample_user(1)))).is_ok());
    pool.run();

    let stored = h.api.credentials().load().unwrap();
    assert_eq!(stored.token, "t2");
    assert_eq!(stored.user.user_id, 2);
    assert_eq!(session.snapshot().user_id(), Some(2));
}

// =============================================================
// Logout
// =============================================================

#[test]
fn logout_clears_everything_without_network() {
    let h = Harness::new();
    let session = signed_in_controller(&h);

    session.logout();

    assert!(h.storage.is_empty());
    assert!(h.transport.sent().is_empty());
    assert_eq!(session.snapshot(), AuthState { user: None, loading: false, error: None });
}

#[test]
fn forced_logout_from_any_request_resets_state() {
    let h = Harness::new();
    let session = signed_in_controller(&h);
    h.transport.reply(401, "");
    h.transport.reply(401, "");

    let first = block_on(api::list_todos(&h.api, 1)).unwrap_err();
    let second = block_on(api::list_memos(&h.api, 1)).unwrap_err();

    assert!(first.is_authentication());
    assert!(second.is_authentication());
    assert_eq!(h.navigator.visits(), vec!["/login".to_owned()]);
    assert_eq!(session.snapshot().phase(), SessionPhase::Anonymous);
}

#[test]
fn rejection_after_storage_cleared_elsewhere_signs_out() {
    let h = Harness::new();
    let session = signed_in_controller(&h);
    h.api.credentials().clear();
    h.transport.reply(401, "");

    let err = block_on(api::list_todos(&h.api, 1)).unwrap_err();

    assert!(err.is_authentication());
    assert_eq!(session.snapshot().phase(), SessionPhase::Anonymous);
    assert!(h.storage.is_empty());
}

#[test]
fn dropping_last_controller_unsubscribes() {
    let h = Harness::new();
    let session = controller(&h);
    let clone = session.clone();
    assert_eq!(h.api.events().listener_count(), 1);

    drop(session);
    assert_eq!(h.api.events().listener_count(), 1);
    drop(clone);
    assert_eq!(h.api.events().listener_count(), 0);
}

// =============================================================
// Profile
// =============================================================

#[test]
fn update_profile_adopts_server_profile_and_keeps_token() {
    let h = Harness::new();
    let session = signed_in_controller(&h);
    let fresh = UserProfile { nickname: "n2".into(), ..sample_user(1) };
    h.transport.reply(200, &user_json(&fresh));
    let change = ProfileChange::Fields(ProfileUpdate { nickname: Some("n2".into()), ..ProfileUpdate::default() });

    block_on(session.update_profile(change)).unwrap();

    let sent = h.transport.last_sent();
    assert!(!sent.is_multipart());
    assert_eq!(sent.header("Content-Type"), Some(crate::net::http::JSON_CONTENT_TYPE));
    let stored = h.api.credentials().load().unwrap();
    assert_eq!(stored.token, "t1");
    assert_eq!(stored.user.nickname, "n2");
    assert_eq!(session.snapshot().user.map(|u| u.nickname), Some("n2".to_owned()));
}

#[test]
fn update_profile_with_image_goes_multipart() {
    let h = Harness::new();
    let session = signed_in_controller(&h);
    h.transport.reply(200, &user_json(&sample_user(1)));
    let image = FileUpload { file_name: "me.png".into(), mime: "image/png".into(), bytes: vec![1, 2, 3] };
    let change = ProfileChange::WithImage { fields: ProfileUpdate::default(), image };

    block_on(session.update_profile(change)).unwrap();

    let sent = h.transport.last_sent();
    assert!(sent.is_multipart());
    assert_eq!(sent.header("Content-Type"), Some(crate::net::http::MULTIPART_CONTENT_TYPE));
    assert_eq!(sent.header("Authorization"), Some("Bearer t1"));
}

#[test]
fn failed_update_keeps_profile_and_reports() {
    let h = Harness::new();
    let session = signed_in_controller(&h);
    h.transport.reply(400, r#"{"message":"Nickname taken"}"#);

    let err = block_on(session.update_profile(ProfileChange::Fields(ProfileUpdate::default()))).unwrap_err();

    assert_eq!(err.server_message(), Some("Nickname taken"));
    assert_eq!(session.snapshot().user_id(), Some(1));
    assert_eq!(session.snapshot().error.as_deref(), Some("Nickname taken"));
    assert_eq!(h.api.credentials().load().unwrap().user, sample_user(1));
}

#[test]
fn update_landing_after_forced_logout_does_not_resurrect() {
    let h = Harness::new();
    let session = signed_in_controller(&h);
    let reply = h.transport.reply_later();
    let mut pool = LocalPool::new();
    let pending = session.clone();
    pool.spawner()
        .spawn_local(async move {
            let _ = pending.update_profile(ProfileChange::Fields(ProfileUpdate::default())).await;
        })
        .unwrap();
    pool.run_until_stalled();

    assert!(h.api.force_logout());
    assert!(reply.send(ok(&user_json(&sample_user(1)))).is_ok());
    pool.run();

    assert!(h.storage.is_empty());
    assert_eq!(session.snapshot().phase(), SessionPhase::Anonymous);
}

#[test]
fn delete_account_signs_out_on_success() {
    let h = Harness::new();
    let session = signed_in_controller(&h);
    h.transport.reply(204, "");

    block_on(session.delete_account()).unwrap();

    assert!(h.storage.is_empty());
    assert_eq!(session.snapshot().phase(), SessionPhase::Anonymous);
}

#[test]
fn delete_account_failure_keeps_session() {
    let h = Harness::new();
    let session = signed_in_controller(&h);
    h.transport.reply(500, "");

    block_on(session.delete_account()).unwrap_err();

    assert_eq!(h.api.credentials().token().as_deref(), Some("t1"));
    assert_eq!(session.snapshot().phase(), SessionPhase::Authenticated);
    assert_eq!(session.snapshot().error.as_deref(), Some(DELETE_FAILED));
}

// =============================================================
// OAuth
// =============================================================

#[test]
fn oauth_callback_establishes_session() {
    let h = Harness::new();
    let session = controller(&h);
    let params = OAuthCallbackParams::from_query("?token=abc&userId=7&email=kim%40mindset.test&nickname=kim");

    let user = session.process_oauth_callback(params).unwrap();

    assert_eq!(user.user_id, 7);
    assert_eq!(user.email, "kim@mindset.test");
    assert_eq!(h.api.credentials().token().as_deref(), Some("abc"));
    assert_eq!(session.snapshot().phase(), SessionPhase::Authenticated);
}

#[test]
fn oauth_login_with_blank_token_stores_nothing() {
    let h = Harness::new();
    let session = controller(&h);

    let err = session.process_oauth_login("  ", sample_user(7)).unwrap_err();

    assert!(matches!(err, ApiError::Validation(_)));
    assert!(h.storage.is_empty());
    assert!(session.snapshot().error.is_some());
}

#[test]
fn oauth_callback_missing_user_id_is_rejected() {
    let h = Harness::new();
    let session = controller(&h);

    let err = session.process_oauth_callback(OAuthCallbackParams::from_query("token=abc")).unwrap_err();

    assert!(matches!(err, ApiError::Validation(_)));
    assert!(h.storage.is_empty());
}
