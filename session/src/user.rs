//! The authenticated user and the credentials that produce one.

use chrono::{DateTime, Utc};
use mise_core::effect::EffectId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// An authenticated user.
///
/// Serialized with the field names the persisted session has always used,
/// so an existing `userData` record keeps loading.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Email address the user signed in with.
    pub email: String,

    /// Identity-service user id (`localId`).
    pub id: String,

    /// Bearer token returned by the identity service.
    #[serde(rename = "_token")]
    pub token: String,

    /// Instant the token stops being valid.
    #[serde(rename = "_tokenExpirationDate")]
    pub token_expiration: DateTime<Utc>,

    /// Whether authenticating as this user should navigate home.
    #[serde(default)]
    pub redirect: bool,
}

impl User {
    /// `true` while `now` is before the token expiration.
    #[must_use]
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        now < self.token_expiration
    }

    /// The token, if it is still valid at `now`.
    #[must_use]
    pub fn token(&self, now: DateTime<Utc>) -> Option<&str> {
        self.is_valid(now).then_some(self.token.as_str())
    }

    /// Time left until the token expires, zero once it has.
    #[must_use]
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.token_expiration - now).to_std().unwrap_or(Duration::ZERO)
    }

    /// Same user with a different redirect flag.
    #[must_use]
    pub fn with_redirect(mut self, redirect: bool) -> Self {
        self.redirect = redirect;
        self
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("email", &self.email)
            .field("id", &self.id)
            .field("token", &"<redacted>")
            .field("token_expiration", &self.token_expiration)
            .field("redirect", &self.redirect)
            .finish()
    }
}

/// Email and password submitted by the auth form.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Email address.
    pub email: String,

    /// Plain-text password, only ever sent to the identity service.
    pub password: String,
}

impl Credentials {
    /// Create credentials.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Which identity operation an attempt uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthMode {
    /// Sign in to an existing account.
    Login,

    /// Create a new account.
    SignUp,
}

impl AuthMode {
    /// Identity-service operation path for this mode.
    #[must_use]
    pub const fn operation(self) -> &'static str {
        match self {
            Self::Login => "accounts:signInWithPassword",
            Self::SignUp => "accounts:signUp",
        }
    }

    /// Slot the in-flight request for this mode occupies.
    ///
    /// Login and sign-up have separate slots, so a sign-up does not
    /// supersede a pending login.
    #[must_use]
    pub const fn request_id(self) -> EffectId {
        match self {
            Self::Login => crate::effects::LOGIN_REQUEST,
            Self::SignUp => crate::effects::SIGN_UP_REQUEST,
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => f.write_str("login"),
            Self::SignUp => f.write_str("sign-up"),
        }
    }
}
