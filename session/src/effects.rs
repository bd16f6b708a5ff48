//! Session effects.
//!
//! Everything the session flow does outside the reducer: identity calls,
//! persistence, the logout timer and navigation. The reducer decides when
//! each of these runs; the builders here describe what runs.
//!
//! Effects are **values**, not execution. The store runtime executes them
//! and feeds any resulting action back into the session reducer.

use crate::actions::SessionAction;
use crate::providers::{IdentityProvider, Navigator, Route, SessionRepository};
use crate::user::{AuthMode, Credentials, User};
use chrono::{DateTime, Utc};
use mise_core::effect::{Effect, EffectId};
use mise_core::environment::Clock;
use mise_core::{async_effect, delay};
use std::sync::Arc;

/// Slot of the in-flight login request.
pub const LOGIN_REQUEST: EffectId = EffectId::new("session.login");

/// Slot of the in-flight sign-up request.
pub const SIGN_UP_REQUEST: EffectId = EffectId::new("session.sign_up");

/// Slot of the armed logout timer.
pub const LOGOUT_TIMER: EffectId = EffectId::new("session.logout_timer");

/// Call the identity service for one attempt.
///
/// Always resolves to [`SessionAction::AttemptSettled`]; failures are
/// turned into the user-facing message here. Runs under the mode's request
/// slot, so starting another attempt of the same mode aborts this one.
pub fn authenticate<I>(
    identity: &I,
    clock: &Arc<dyn Clock>,
    mode: AuthMode,
    attempt: u64,
    credentials: Credentials,
) -> Effect<SessionAction>
where
    I: IdentityProvider + Clone + 'static,
{
    let identity = identity.clone();
    let clock = Arc::clone(clock);

    let call = async_effect! {
        let granted = identity.authenticate(mode, &credentials).await;
        let outcome = match granted.and_then(|grant| grant.into_user(clock.now())) {
            Ok(user) => Ok(user),
            Err(error) => {
                tracing::warn!(%mode, attempt, %error, "Authentication attempt failed");
                Err(error.user_message().to_string())
            },
        };
        Some(SessionAction::AttemptSettled { mode, attempt, outcome })
    };
    call.cancellable(mode.request_id())
}

/// Persist a freshly authenticated user, then announce the sign-in.
///
/// A failed write is logged and the user stays signed in. Shares the
/// request slot of `mode` so a newer attempt still supersedes it.
pub fn persist_and_sign_in<P>(repository: &P, mode: AuthMode, user: User) -> Effect<SessionAction>
where
    P: SessionRepository + Clone + 'static,
{
    let repository = repository.clone();

    let persist = async_effect! {
        if let Err(error) = repository.save(&user).await {
            tracing::warn!(%error, "Could not persist session, continuing signed in");
        }
        Some(SessionAction::AuthenticateSuccess { user, redirect: true })
    };
    persist.cancellable(mode.request_id())
}

/// Arm the logout timer for the rest of `user`'s token lifetime.
///
/// Replaces any timer already armed.
#[must_use]
pub fn arm_logout_timer(user: &User, now: DateTime<Utc>) -> Effect<SessionAction> {
    let timer = delay! {
        duration: user.remaining(now),
        action: SessionAction::Logout
    };
    timer.cancellable(LOGOUT_TIMER)
}

/// Show `route`.
pub fn navigate<N>(navigator: &N, route: Route) -> Effect<SessionAction>
where
    N: Navigator + Clone + 'static,
{
    let navigator = navigator.clone();
    async_effect! {
        navigator.navigate(route);
        None
    }
}

/// Delete the persisted user.
pub fn clear_session<P>(repository: &P) -> Effect<SessionAction>
where
    P: SessionRepository + Clone + 'static,
{
    let repository = repository.clone();
    async_effect! {
        if let Err(error) = repository.clear().await {
            tracing::warn!(%error, "Could not delete persisted session");
        }
        None
    }
}

/// Delete the persisted user, then return to the auth form.
pub fn end_session<P, N>(repository: &P, navigator: &N) -> Effect<SessionAction>
where
    P: SessionRepository + Clone + 'static,
    N: Navigator + Clone + 'static,
{
    Effect::chain(vec![
        clear_session(repository),
        navigate(navigator, Route::Auth),
    ])
}

/// Load the persisted user and resume the session if its token is valid.
pub fn restore_session<P>(repository: &P, clock: &Arc<dyn Clock>) -> Effect<SessionAction>
where
    P: SessionRepository + Clone + 'static,
{
    let repository = repository.clone();
    let clock = Arc::clone(clock);
    async_effect! {
        match repository.load().await {
            Ok(Some(user)) if user.is_valid(clock.now()) => {
                tracing::info!(email = %user.email, "Restoring persisted session");
                Some(SessionAction::AuthenticateSuccess {
                    user: user.with_redirect(false),
                    redirect: false,
                })
            },
            Ok(Some(user)) => {
                tracing::debug!(
                    email = %user.email,
                    expired_at = %user.token_expiration,
                    "Persisted session has expired"
                );
                Some(SessionAction::AutoLoginSkipped)
            },
            Ok(None) => Some(SessionAction::AutoLoginSkipped),
            Err(error) => {
                tracing::warn!(%error, "Could not read persisted session");
                Some(SessionAction::AutoLoginSkipped)
            },
        }
    }
}
