//! Integration tests for the session flow running on a real store.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use mise_core::environment::Clock;
use mise_runtime::Store;
use mise_session::effects::{LOGIN_REQUEST, LOGOUT_TIMER};
use mise_session::error::GENERIC_AUTH_MESSAGE;
use mise_session::mocks::{InMemorySessionRepository, MockIdentityProvider, RecordingNavigator};
use mise_session::{
    Credentials, IdentityErrorCode, Route, SessionAction, SessionEnvironment, SessionReducer,
    SessionState, User,
};
use mise_testing::{MockClock, test_instant};
use std::sync::Arc;
use std::time::Duration;

type TestStore = Store<
    SessionState,
    SessionAction,
    SessionEnvironment<MockIdentityProvider, InMemorySessionRepository, RecordingNavigator>,
    SessionReducer<MockIdentityProvider, InMemorySessionRepository, RecordingNavigator>,
>;

struct Harness {
    store: TestStore,
    repository: InMemorySessionRepository,
    navigator: RecordingNavigator,
    identity: MockIdentityProvider,
}

fn harness(identity: MockIdentityProvider, repository: InMemorySessionRepository) -> Harness {
    let clock: Arc<dyn Clock> = Arc::new(MockClock::new(test_instant()));
    let navigator = RecordingNavigator::new();
    let env =
        SessionEnvironment::new(identity.clone(), repository.clone(), navigator.clone(), clock);
    Harness {
        store: Store::new(SessionState::default(), SessionReducer::new(), env),
        repository,
        navigator,
        identity,
    }
}

fn persisted(expires_in: chrono::Duration) -> User {
    User {
        email: "cook@example.com".to_string(),
        id: "uid-1".to_string(),
        token: "token".to_string(),
        token_expiration: test_instant() + expires_in,
        redirect: true,
    }
}

fn login(email: &str) -> SessionAction {
    SessionAction::LoginStart {
        credentials: Credentials::new(email, "hunter2"),
    }
}

const WAIT: Duration = Duration::from_secs(2);

fn is_outcome(action: &SessionAction) -> bool {
    matches!(
        action,
        SessionAction::AuthenticateSuccess { .. } | SessionAction::AuthenticateFail { .. }
    )
}

#[tokio::test]
async fn test_login_signs_in_persists_and_goes_home() {
    let h = harness(
        MockIdentityProvider::new().accept("cook@example.com", 3600),
        InMemorySessionRepository::new(),
    );

    let outcome = h
        .store
        .send_and_wait_for(login("cook@example.com"), is_outcome, WAIT)
        .await
        .unwrap();

    let SessionAction::AuthenticateSuccess { user, redirect } = outcome else {
        panic!("expected success, got {outcome:?}");
    };
    assert!(redirect);
    assert_eq!(user.email, "cook@example.com");
    assert_eq!(user.token_expiration, test_instant() + chrono::Duration::seconds(3600));

    // Let the success reduction and its navigation effect land
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(h.store.state(|s| s.user.clone()).await, Some(user.clone()));
    assert_eq!(h.repository.stored(), Some(user));
    assert_eq!(h.navigator.routes(), vec![Route::Home]);
    assert!(h.store.is_in_flight(LOGOUT_TIMER));
}

#[tokio::test]
async fn test_only_latest_login_reaches_the_store() {
    let h = harness(
        MockIdentityProvider::new()
            .accept("first@example.com", 3600)
            .with_latency("first@example.com", Duration::from_millis(150))
            .accept("second@example.com", 3600)
            .with_latency("second@example.com", Duration::from_millis(20)),
        InMemorySessionRepository::new(),
    );
    let mut observed = h.store.subscribe_actions();

    h.store.send(login("first@example.com")).await.unwrap();
    h.store.send(login("second@example.com")).await.unwrap();

    // Outlive the slow first call
    tokio::time::sleep(Duration::from_millis(300)).await;

    let user = h.store.state(|s| s.user.clone()).await.unwrap();
    assert_eq!(user.email, "second@example.com");
    assert_eq!(h.repository.stored().unwrap().email, "second@example.com");
    assert_eq!(h.identity.calls().len(), 2);

    let mut successes = Vec::new();
    while let Ok(action) = observed.try_recv() {
        if let SessionAction::AuthenticateSuccess { user, .. } = action {
            successes.push(user.email);
        }
    }
    assert_eq!(successes, vec!["second@example.com".to_string()]);
    assert!(!h.store.is_in_flight(LOGIN_REQUEST));
}

#[tokio::test]
async fn test_invalid_password_fails_without_signing_in() {
    let h = harness(
        MockIdentityProvider::new().reject("cook@example.com", IdentityErrorCode::InvalidPassword),
        InMemorySessionRepository::new(),
    );

    let outcome = h
        .store
        .send_and_wait_for(login("cook@example.com"), is_outcome, WAIT)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        SessionAction::AuthenticateFail {
            message: "This password is not correct".to_string()
        }
    );
    assert!(h.store.state(|s| s.user.is_none()).await);
    assert_eq!(h.repository.save_count(), 0);
    assert!(h.navigator.routes().is_empty());
}

#[tokio::test]
async fn test_failed_login_does_not_stop_later_attempts() {
    let h = harness(
        MockIdentityProvider::new()
            .reject("new@example.com", IdentityErrorCode::EmailNotFound)
            .accept("cook@example.com", 3600),
        InMemorySessionRepository::new(),
    );

    let first = h
        .store
        .send_and_wait_for(login("new@example.com"), is_outcome, WAIT)
        .await
        .unwrap();
    let second = h
        .store
        .send_and_wait_for(login("cook@example.com"), is_outcome, WAIT)
        .await
        .unwrap();

    assert_eq!(
        first,
        SessionAction::AuthenticateFail {
            message: "This email does not exist".to_string()
        }
    );
    assert!(matches!(second, SessionAction::AuthenticateSuccess { .. }));
}

#[tokio::test]
async fn test_unrepresentable_token_lifetime_fails_login() {
    let h = harness(
        MockIdentityProvider::new().accept("cook@example.com", i64::MAX / 2),
        InMemorySessionRepository::new(),
    );

    let outcome = h
        .store
        .send_and_wait_for(login("cook@example.com"), is_outcome, WAIT)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        SessionAction::AuthenticateFail {
            message: GENERIC_AUTH_MESSAGE.to_string()
        }
    );
    assert!(h.store.state(|s| s.user.is_none()).await);
    assert_eq!(h.repository.save_count(), 0);
}

#[tokio::test]
async fn test_sign_up_for_existing_email() {
    let h = harness(
        MockIdentityProvider::new().reject("cook@example.com", IdentityErrorCode::EmailExists),
        InMemorySessionRepository::new(),
    );

    let outcome = h
        .store
        .send_and_wait_for(
            SessionAction::SignUpStart {
                credentials: Credentials::new("cook@example.com", "hunter2"),
            },
            is_outcome,
            WAIT,
        )
        .await
        .unwrap();

    assert_eq!(
        outcome,
        SessionAction::AuthenticateFail {
            message: "This email exists already".to_string()
        }
    );
}

#[tokio::test]
async fn test_persistence_failure_is_not_fatal() {
    let repository = InMemorySessionRepository::new();
    repository.fail_writes(true);
    let h = harness(
        MockIdentityProvider::new().accept("cook@example.com", 3600),
        repository,
    );

    let outcome = h
        .store
        .send_and_wait_for(login("cook@example.com"), is_outcome, WAIT)
        .await
        .unwrap();

    assert!(matches!(outcome, SessionAction::AuthenticateSuccess { .. }));
    assert_eq!(h.repository.save_count(), 1);
    assert_eq!(h.repository.stored(), None);
}

#[tokio::test]
async fn test_auto_login_with_expired_user_is_skipped() {
    let h = harness(
        MockIdentityProvider::new(),
        InMemorySessionRepository::with_user(persisted(chrono::Duration::seconds(-1))),
    );

    let outcome = h
        .store
        .send_and_wait_for(SessionAction::AutoLogin, |_| true, WAIT)
        .await
        .unwrap();

    assert_eq!(outcome, SessionAction::AutoLoginSkipped);
    assert!(h.store.state(|s| s.user.is_none()).await);
    assert!(!h.store.is_in_flight(LOGOUT_TIMER));
}

#[tokio::test]
async fn test_auto_login_without_record_is_skipped() {
    let h = harness(MockIdentityProvider::new(), InMemorySessionRepository::new());

    let outcome = h
        .store
        .send_and_wait_for(SessionAction::AutoLogin, |_| true, WAIT)
        .await
        .unwrap();

    assert_eq!(outcome, SessionAction::AutoLoginSkipped);
}

#[tokio::test]
async fn test_auto_login_restores_valid_user_without_redirect() {
    let h = harness(
        MockIdentityProvider::new(),
        InMemorySessionRepository::with_user(persisted(chrono::Duration::hours(1))),
    );

    let outcome = h
        .store
        .send_and_wait_for(SessionAction::AutoLogin, |_| true, WAIT)
        .await
        .unwrap();

    let SessionAction::AuthenticateSuccess { user, redirect } = outcome else {
        panic!("expected success, got {outcome:?}");
    };
    assert!(!redirect);
    assert!(!user.redirect);
    assert_eq!(user.email, "cook@example.com");

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(h.store.state(|s| s.is_authenticated()).await);
    assert!(h.store.is_in_flight(LOGOUT_TIMER));
    assert!(h.navigator.routes().is_empty());
}

#[tokio::test]
async fn test_logout_timer_fires_logout() {
    let h = harness(
        MockIdentityProvider::new(),
        InMemorySessionRepository::with_user(persisted(chrono::Duration::milliseconds(80))),
    );

    let fired = h
        .store
        .send_and_wait_for(
            SessionAction::AutoLogin,
            |action| matches!(action, SessionAction::Logout),
            WAIT,
        )
        .await
        .unwrap();
    assert_eq!(fired, SessionAction::Logout);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(h.store.state(|s| s.user.is_none()).await);
    assert_eq!(h.repository.stored(), None);
    assert_eq!(h.navigator.routes(), vec![Route::Auth]);
}

#[tokio::test]
async fn test_logout_is_idempotent_and_disarms_timer() {
    let h = harness(
        MockIdentityProvider::new(),
        InMemorySessionRepository::with_user(persisted(chrono::Duration::hours(1))),
    );
    h.store
        .send_and_wait_for(SessionAction::AutoLogin, |_| true, WAIT)
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(h.store.is_in_flight(LOGOUT_TIMER));

    let mut first = h.store.send(SessionAction::Logout).await.unwrap();
    assert!(!h.store.is_in_flight(LOGOUT_TIMER));
    let mut second = h.store.send(SessionAction::Logout).await.unwrap();
    first.wait_with_timeout(WAIT).await.unwrap();
    second.wait_with_timeout(WAIT).await.unwrap();

    assert!(h.store.state(|s| s.user.is_none()).await);
    assert_eq!(h.repository.stored(), None);
    assert_eq!(h.repository.clear_count(), 2);
    assert_eq!(h.navigator.routes(), vec![Route::Auth, Route::Auth]);
}

#[tokio::test]
async fn test_relogin_replaces_logout_timer() {
    let h = harness(
        MockIdentityProvider::new().accept("cook@example.com", 3600),
        InMemorySessionRepository::with_user(persisted(chrono::Duration::milliseconds(100))),
    );
    let mut observed = h.store.subscribe_actions();

    // Short-lived restored session, then a fresh login before it expires
    h.store
        .send_and_wait_for(SessionAction::AutoLogin, |_| true, WAIT)
        .await
        .unwrap();
    h.store
        .send_and_wait_for(login("cook@example.com"), is_outcome, WAIT)
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(250)).await;

    assert!(h.store.state(|s| s.is_authenticated()).await);
    while let Ok(action) = observed.try_recv() {
        assert_ne!(action, SessionAction::Logout, "replaced timer must not fire");
    }
}
