//! Session reducer.
//!
//! Folds session actions into [`SessionState`] and decides which session
//! effects run.
//!
//! # Flow
//!
//! 1. `LoginStart` / `SignUpStart` bump the mode's attempt counter and
//!    start an identity call in the mode's request slot (aborting the
//!    previous call of that mode)
//! 2. The call settles as `AttemptSettled`, tagged with its attempt; a
//!    result from an older attempt is dropped
//! 3. Success persists the user and produces `AuthenticateSuccess`;
//!    failure produces `AuthenticateFail` with a user-facing message
//! 4. `AuthenticateSuccess` signs the user in and arms the logout timer
//! 5. `Logout` (from the user or the timer) signs out, disarms the timer,
//!    deletes the persisted user and returns to the auth route
//!
//! `AutoLogin` restores a persisted, still-valid user at start-up.

use crate::actions::SessionAction;
use crate::effects::{self, LOGOUT_TIMER};
use crate::environment::SessionEnvironment;
use crate::providers::{IdentityProvider, Navigator, Route, SessionRepository};
use crate::state::SessionState;
use crate::user::{AuthMode, Credentials};
use mise_core::effect::Effect;
use mise_core::reducer::Reducer;
use mise_core::{SmallVec, emit, smallvec};

/// Session reducer.
#[derive(Debug, Clone)]
pub struct SessionReducer<I, P, N> {
    /// Phantom data to hold type parameters.
    _phantom: std::marker::PhantomData<(I, P, N)>,
}

impl<I, P, N> SessionReducer<I, P, N> {
    /// Create a new session reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<I, P, N> Default for SessionReducer<I, P, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, P, N> SessionReducer<I, P, N>
where
    I: IdentityProvider + Clone + 'static,
    P: SessionRepository + Clone + 'static,
    N: Navigator + Clone + 'static,
{
    fn start_attempt(
        state: &mut SessionState,
        mode: AuthMode,
        credentials: Credentials,
        env: &SessionEnvironment<I, P, N>,
    ) -> SmallVec<[Effect<SessionAction>; 4]> {
        let attempt = state.next_attempt(mode);
        tracing::debug!(
            %mode,
            attempt,
            email = %credentials.email,
            "Starting authentication attempt"
        );

        smallvec![effects::authenticate(
            &env.identity,
            &env.clock,
            mode,
            attempt,
            credentials,
        )]
    }
}

impl<I, P, N> Reducer for SessionReducer<I, P, N>
where
    I: IdentityProvider + Clone + 'static,
    P: SessionRepository + Clone + 'static,
    N: Navigator + Clone + 'static,
{
    type State = SessionState;
    type Action = SessionAction;
    type Environment = SessionEnvironment<I, P, N>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            SessionAction::LoginStart { credentials } => {
                Self::start_attempt(state, AuthMode::Login, credentials, env)
            },

            SessionAction::SignUpStart { credentials } => {
                Self::start_attempt(state, AuthMode::SignUp, credentials, env)
            },

            SessionAction::AttemptSettled {
                mode,
                attempt,
                outcome,
            } => {
                if !state.is_latest(mode, attempt) {
                    tracing::debug!(%mode, attempt, "Dropping result of superseded attempt");
                    return smallvec![Effect::None];
                }

                match outcome {
                    Ok(user) => {
                        smallvec![effects::persist_and_sign_in(&env.repository, mode, user)]
                    },
                    Err(message) => smallvec![emit!(SessionAction::AuthenticateFail { message })],
                }
            },

            SessionAction::AuthenticateSuccess { user, redirect } => {
                let now = env.clock.now();
                tracing::info!(
                    email = %user.email,
                    expires_in_secs = user.remaining(now).as_secs(),
                    redirect,
                    "Signed in"
                );

                let timer = effects::arm_logout_timer(&user, now);
                state.user = Some(user);

                if redirect {
                    smallvec![timer, effects::navigate(&env.navigator, Route::Home)]
                } else {
                    smallvec![timer]
                }
            },

            SessionAction::AuthenticateFail { message } => {
                tracing::info!(%message, "Authentication failed");
                smallvec![Effect::None]
            },

            SessionAction::Logout => {
                match state.user.take() {
                    Some(user) => tracing::info!(email = %user.email, "Signed out"),
                    None => tracing::debug!("Logout without an active session"),
                }

                smallvec![
                    Effect::Cancel(LOGOUT_TIMER),
                    effects::end_session(&env.repository, &env.navigator),
                ]
            },

            SessionAction::AutoLogin => {
                smallvec![effects::restore_session(&env.repository, &env.clock)]
            },

            SessionAction::AutoLoginSkipped => smallvec![Effect::None],
        }
    }
}
