use super::*;
use crate::test_support::sample_user;

fn state(user: bool, loading: bool) -> AuthState {
    AuthState { user: user.then(|| sample_user(1)), loading, error: None }
}

#[test]
fn should_redirect_unauth_when_not_loading_and_user_missing() {
    assert!(should_redirect_unauth(&state(false, false)));
}

#[test]
fn should_not_redirect_while_loading() {
    assert!(!should_redirect_unauth(&state(false, true)));
}

#[test]
fn should_not_redirect_when_user_exists() {
    assert!(!should_redirect_unauth(&state(true, false)));
}

#[test]
fn resolving_renders_placeholder_even_with_cached_user() {
    assert_eq!(guard_decision(&state(true, true)), GuardDecision::Placeholder);
    assert_eq!(guard_decision(&AuthState::default()), GuardDecision::Placeholder);
}

#[test]
fn authenticated_renders_children() {
    assert_eq!(guard_decision(&state(true, false)), GuardDecision::Render);
}

// =============================================================
// Redirect latch
// =============================================================

#[test]
fn anonymous_redirects_exactly_once() {
    let latch = RedirectLatch::default();
    assert!(!redirect_due(&latch, GuardDecision::Placeholder));
    assert!(redirect_due(&latch, GuardDecision::Redirect));
    assert!(!redirect_due(&latch, GuardDecision::Redirect));
    assert!(latch.has_fired());
}

#[test]
fn authenticating_rearms_the_latch() {
    let latch = RedirectLatch::default();
    assert!(redirect_due(&latch, GuardDecision::Redirect));
    assert!(!redirect_due(&latch, GuardDecision::Render));
    assert!(redirect_due(&latch, GuardDecision::Redirect));
}

#[test]
fn clones_share_the_latch() {
    let latch = RedirectLatch::default();
    let other = latch.clone();
    assert!(latch.fire());
    assert!(!other.fire());
    other.reset();
    assert!(!latch.has_fired());
}

// =============================================================
// Installed guard effect
// =============================================================

#[test]
fn installed_guard_navigates_to_login_once_with_replace() {
    use std::cell::RefCell;

    use any_spawner::Executor;

    let _ = Executor::init_futures_executor();
    let owner = Owner::new();
    owner.set();

    let auth = RwSignal::new(AuthState::default());
    let visits = Rc::new(RefCell::new(Vec::new()));
    let latch = {
        let visits = visits.clone();
        install_unauth_redirect(auth, move |path: &str, options: NavigateOptions| {
            visits.borrow_mut().push((path.to_owned(), options.replace));
        })
    };

    Executor::poll_local();
    assert!(visits.borrow().is_empty());

    auth.set(state(false, false));
    Executor::poll_local();
    assert_eq!(*visits.borrow(), vec![(LOGIN_PATH.to_owned(), true)]);

    // Still anonymous: the effect re-runs but does not navigate again.
    auth.update(|s| s.error = Some("Login failed.".to_owned()));
    Executor::poll_local();
    assert_eq!(visits.borrow().len(), 1);
    assert!(latch.has_fired());

    // Signing in re-arms the guard for the next anonymous stretch.
    auth.set(state(true, false));
    Executor::poll_local();
    assert!(!latch.has_fired());
    assert_eq!(visits.borrow().len(), 1);
}
