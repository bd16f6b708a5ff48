//! Session actions.

use crate::user::{AuthMode, Credentials, User};

/// Everything that can happen to a session.
///
/// UI commands (`LoginStart`, `SignUpStart`, `Logout`, `AutoLogin`) are
/// dispatched by the shell; the rest are produced by session effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Sign in with email and password.
    LoginStart {
        /// Submitted credentials.
        credentials: Credentials,
    },

    /// Create an account with email and password.
    SignUpStart {
        /// Submitted credentials.
        credentials: Credentials,
    },

    /// One identity call finished.
    ///
    /// Tagged with the attempt number it was started under so a result
    /// that lost the race to a newer attempt can be dropped.
    AttemptSettled {
        /// Login or sign-up.
        mode: AuthMode,
        /// Attempt counter value when the call started.
        attempt: u64,
        /// The user, or the message to show.
        outcome: Result<User, String>,
    },

    /// A user is now signed in.
    AuthenticateSuccess {
        /// The signed-in user.
        user: User,
        /// Navigate to the home route.
        redirect: bool,
    },

    /// Login or sign-up failed.
    AuthenticateFail {
        /// Message to show the user.
        message: String,
    },

    /// End the session (user request or token expiry).
    Logout,

    /// Restore a persisted session at start-up.
    AutoLogin,

    /// Nothing to restore.
    AutoLoginSkipped,
}
