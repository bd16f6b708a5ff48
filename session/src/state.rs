//! Session state.

use crate::user::{AuthMode, User};

/// State owned by the session store.
///
/// No error is kept here; failures reach the UI as broadcast
/// [`AuthenticateFail`](crate::actions::SessionAction::AuthenticateFail)
/// actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Signed-in user, if any.
    pub user: Option<User>,

    /// Generation of the latest login attempt.
    pub login_attempt: u64,

    /// Generation of the latest sign-up attempt.
    pub sign_up_attempt: u64,
}

impl SessionState {
    /// `true` when a user is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Start a new attempt for `mode` and return its generation.
    pub fn next_attempt(&mut self, mode: AuthMode) -> u64 {
        let counter = match mode {
            AuthMode::Login => &mut self.login_attempt,
            AuthMode::SignUp => &mut self.sign_up_attempt,
        };
        *counter += 1;
        *counter
    }

    /// Whether `attempt` is the newest attempt for `mode`.
    #[must_use]
    pub const fn is_latest(&self, mode: AuthMode, attempt: u64) -> bool {
        let latest = match mode {
            AuthMode::Login => self.login_attempt,
            AuthMode::SignUp => self.sign_up_attempt,
        };
        attempt == latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempts_are_counted_per_mode() {
        let mut state = SessionState::default();

        let first_login = state.next_attempt(AuthMode::Login);
        let sign_up = state.next_attempt(AuthMode::SignUp);
        let second_login = state.next_attempt(AuthMode::Login);

        assert_eq!((first_login, second_login, sign_up), (1, 2, 1));
        assert!(!state.is_latest(AuthMode::Login, first_login));
        assert!(state.is_latest(AuthMode::Login, second_login));
        assert!(state.is_latest(AuthMode::SignUp, sign_up));
    }
}
