//! Session providers.
//!
//! Traits for the external collaborators the session effects talk to,
//! plus their production implementations. The reducer depends only on the
//! traits; tests substitute the in-memory versions from [`crate::mocks`].

use crate::error::{IdentityError, Result};
use crate::user::{AuthMode, Credentials, User};
use chrono::{DateTime, TimeDelta, Utc};
use std::future::Future;

pub mod file;
pub mod firebase;
pub mod navigation;

pub use file::FileSessionRepository;
pub use firebase::FirebaseIdentityClient;
pub use navigation::{Navigator, Route, RouteChannel};

/// Successful answer from the identity service.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthGrant {
    /// Bearer token.
    pub id_token: String,

    /// Email the account is registered under.
    pub email: String,

    /// Refresh token (kept, never used: tokens are not refreshed).
    pub refresh_token: String,

    /// Token lifetime in seconds.
    pub expires_in: i64,

    /// Account id.
    pub local_id: String,
}

impl AuthGrant {
    /// Build the session user for this grant, received at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::MalformedResponse`] when the token lifetime
    /// does not yield a representable expiration instant.
    pub fn into_user(self, now: DateTime<Utc>) -> std::result::Result<User, IdentityError> {
        let token_expiration = TimeDelta::try_seconds(self.expires_in)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                IdentityError::MalformedResponse(format!(
                    "expiresIn of {} seconds is out of range",
                    self.expires_in
                ))
            })?;

        Ok(User {
            email: self.email,
            id: self.local_id,
            token: self.id_token,
            token_expiration,
            redirect: true,
        })
    }
}

impl std::fmt::Debug for AuthGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGrant")
            .field("email", &self.email)
            .field("local_id", &self.local_id)
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}

/// Remote identity service.
pub trait IdentityProvider: Send + Sync {
    /// Sign in or sign up with `credentials`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Rejected`] when the service refuses the
    /// credentials and [`IdentityError::Transport`] or
    /// [`IdentityError::MalformedResponse`] when no usable answer arrives.
    fn authenticate(
        &self,
        mode: AuthMode,
        credentials: &Credentials,
    ) -> impl Future<Output = std::result::Result<AuthGrant, IdentityError>> + Send;
}

/// Persisted copy of the signed-in user.
///
/// One record under a fixed key; written on every successful
/// authentication, read at start-up, deleted on logout.
pub trait SessionRepository: Send + Sync {
    /// Load the persisted user.
    ///
    /// A missing or unreadable record is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Storage`](crate::error::SessionError::Storage)
    /// if the backing store cannot be reached at all.
    fn load(&self) -> impl Future<Output = Result<Option<User>>> + Send;

    /// Replace the persisted user.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Storage`](crate::error::SessionError::Storage)
    /// if the write fails.
    fn save(&self, user: &User) -> impl Future<Output = Result<()>> + Send;

    /// Delete the persisted user. Deleting nothing succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Storage`](crate::error::SessionError::Storage)
    /// if the delete fails.
    fn clear(&self) -> impl Future<Output = Result<()>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn grant(expires_in: i64) -> AuthGrant {
        AuthGrant {
            id_token: "token".to_string(),
            email: "cook@example.com".to_string(),
            refresh_token: String::new(),
            expires_in,
            local_id: "uid-1".to_string(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single().unwrap_or_default()
    }

    #[test]
    fn test_into_user_sets_expiration() {
        let user = grant(3600).into_user(now());
        assert_eq!(
            user.map(|u| u.token_expiration),
            Ok(now() + TimeDelta::hours(1))
        );
    }

    #[test]
    fn test_into_user_rejects_unrepresentable_lifetime() {
        for expires_in in [i64::MAX / 2, 99_999_999_999_999_999, i64::MIN] {
            assert!(matches!(
                grant(expires_in).into_user(now()),
                Err(IdentityError::MalformedResponse(_))
            ));
        }
        // Representable as a duration, but past the last representable instant
        assert!(grant(9_000_000_000_000_000).into_user(now()).is_err());
    }
}
