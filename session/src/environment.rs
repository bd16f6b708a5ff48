//! Session environment.
//!
//! This module defines the environment type for dependency injection
//! in the session reducer.

use crate::providers::{IdentityProvider, Navigator, SessionRepository};
use mise_core::environment::Clock;
use std::sync::Arc;

/// Session environment.
///
/// Contains all external dependencies needed by the session reducer.
///
/// # Type Parameters
///
/// - `I`: Identity provider
/// - `P`: Session repository
/// - `N`: Navigator
#[derive(Clone)]
pub struct SessionEnvironment<I, P, N>
where
    I: IdentityProvider + Clone,
    P: SessionRepository + Clone,
    N: Navigator + Clone,
{
    /// Identity service (login / sign-up).
    pub identity: I,

    /// Persisted copy of the signed-in user.
    pub repository: P,

    /// Route changes.
    pub navigator: N,

    /// Time source for token expiry.
    pub clock: Arc<dyn Clock>,
}

impl<I, P, N> SessionEnvironment<I, P, N>
where
    I: IdentityProvider + Clone,
    P: SessionRepository + Clone,
    N: Navigator + Clone,
{
    /// Create a new session environment.
    #[must_use]
    pub fn new(identity: I, repository: P, navigator: N, clock: Arc<dyn Clock>) -> Self {
        Self {
            identity,
            repository,
            navigator,
            clock,
        }
    }
}
