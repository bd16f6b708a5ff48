//! In-memory session repository.

use crate::error::{Result, SessionError};
use crate::providers::SessionRepository;
use crate::user::User;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Session repository holding the record in memory.
///
/// Clones share the same record, so a test can keep a handle and inspect
/// what the session effects wrote.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionRepository {
    user: Arc<Mutex<Option<User>>>,
    fail_writes: Arc<AtomicBool>,
    saves: Arc<AtomicUsize>,
    clears: Arc<AtomicUsize>,
}

impl InMemorySessionRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository that already holds `user`.
    #[must_use]
    pub fn with_user(user: User) -> Self {
        let repository = Self::new();
        *repository.slot() = Some(user);
        repository
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<User>> {
        self.user.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Currently stored user.
    #[must_use]
    pub fn stored(&self) -> Option<User> {
        self.slot().clone()
    }

    /// Make `save` and `clear` fail from now on (or stop failing).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of `save` calls, failed ones included.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Number of `clear` calls, failed ones included.
    #[must_use]
    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(SessionError::Storage("storage is read-only".to_string()));
        }
        Ok(())
    }
}

impl SessionRepository for InMemorySessionRepository {
    fn load(&self) -> impl Future<Output = Result<Option<User>>> + Send {
        let user = self.stored();
        async move { Ok(user) }
    }

    fn save(&self, user: &User) -> impl Future<Output = Result<()>> + Send {
        self.saves.fetch_add(1, Ordering::SeqCst);
        let result = self.check_writable().map(|()| {
            *self.slot() = Some(user.clone());
        });
        async move { result }
    }

    fn clear(&self) -> impl Future<Output = Result<()>> + Send {
        self.clears.fetch_add(1, Ordering::SeqCst);
        let result = self.check_writable().map(|()| {
            self.slot().take();
        });
        async move { result }
    }
}
