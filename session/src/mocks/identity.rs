//! Scripted identity provider.

use crate::error::{IdentityError, IdentityErrorCode};
use crate::providers::{AuthGrant, IdentityProvider};
use crate::user::{AuthMode, Credentials};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

#[derive(Debug, Clone)]
struct Script {
    result: Result<AuthGrant, IdentityError>,
    latency: Duration,
}

/// Identity provider answering from a per-email script.
///
/// Emails without a script are rejected with `EMAIL_NOT_FOUND`. Every call
/// is recorded.
///
/// # Example
///
/// ```
/// use mise_session::mocks::MockIdentityProvider;
/// use mise_session::error::IdentityErrorCode;
/// use std::time::Duration;
///
/// let identity = MockIdentityProvider::new()
///     .accept("slow@example.com", 3600)
///     .with_latency("slow@example.com", Duration::from_millis(50))
///     .reject("wrong@example.com", IdentityErrorCode::InvalidPassword);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockIdentityProvider {
    scripts: Arc<Mutex<HashMap<String, Script>>>,
    calls: Arc<Mutex<Vec<(AuthMode, String)>>>,
}

impl MockIdentityProvider {
    /// Create a provider with no scripted accounts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn script(self, email: &str, result: Result<AuthGrant, IdentityError>) -> Self {
        self.scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                email.to_string(),
                Script {
                    result,
                    latency: Duration::ZERO,
                },
            );
        self
    }

    /// Grant a token valid for `expires_in` seconds to `email`.
    #[must_use]
    pub fn accept(self, email: &str, expires_in: i64) -> Self {
        let grant = AuthGrant {
            id_token: format!("token-{email}"),
            email: email.to_string(),
            refresh_token: format!("refresh-{email}"),
            expires_in,
            local_id: format!("uid-{email}"),
        };
        self.script(email, Ok(grant))
    }

    /// Reject `email` with an identity error code.
    #[must_use]
    pub fn reject(self, email: &str, code: IdentityErrorCode) -> Self {
        self.script(email, Err(IdentityError::Rejected(code)))
    }

    /// Fail calls for `email` with an arbitrary error.
    #[must_use]
    pub fn fail(self, email: &str, error: IdentityError) -> Self {
        self.script(email, Err(error))
    }

    /// Delay the answer for an already scripted `email`.
    #[must_use]
    pub fn with_latency(self, email: &str, latency: Duration) -> Self {
        if let Some(script) = self
            .scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(email)
        {
            script.latency = latency;
        }
        self
    }

    /// Calls received so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<(AuthMode, String)> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl IdentityProvider for MockIdentityProvider {
    fn authenticate(
        &self,
        mode: AuthMode,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<AuthGrant, IdentityError>> + Send {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((mode, credentials.email.clone()));

        let script = self
            .scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&credentials.email)
            .cloned()
            .unwrap_or(Script {
                result: Err(IdentityError::Rejected(IdentityErrorCode::EmailNotFound)),
                latency: Duration::ZERO,
            });

        async move {
            if !script.latency.is_zero() {
                tokio::time::sleep(script.latency).await;
            }
            script.result
        }
    }
}
