//! Registry of in-flight cancellable effects.
//!
//! Each [`EffectId`] owns at most one running task. Spawning under an id that
//! is already occupied aborts the previous task; this is how the runtime
//! implements "switch to latest" requests and single-instance timers.
//!
//! A task may also hand its own slot to a follow-up effect it produces.
//! That is not a supersede: the caller is left to finish and nothing is
//! counted as cancelled.

use mise_core::effect::EffectId;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::{AbortHandle, Id, JoinHandle};

/// Tracks the task currently occupying each [`EffectId`]
#[derive(Debug, Clone, Default)]
pub struct CancellationRegistry {
    inner: Arc<Mutex<Registry>>,
}

#[derive(Debug, Default)]
struct Registry {
    next_generation: u64,
    in_flight: HashMap<EffectId, InFlight>,
}

#[derive(Debug)]
struct InFlight {
    generation: u64,
    task: Id,
    abort: AbortHandle,
}

/// Frees the registry slot when the task finishes, unless a newer task took it
struct ReleaseGuard {
    registry: CancellationRegistry,
    id: EffectId,
    generation: u64,
}

impl Drop for ReleaseGuard {
    fn drop(&mut self) {
        self.registry.release(self.id, self.generation);
    }
}

impl CancellationRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Spawn `task` under `id`, aborting whatever was running there
    ///
    /// Registration happens before this call returns, so a caller that
    /// spawns twice in a row can never observe both tasks as live. When two
    /// callers race, the later registration wins.
    pub fn spawn<F>(&self, id: EffectId, task: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let generation = {
            let mut registry = self.lock();
            registry.next_generation += 1;
            registry.next_generation
        };

        let guard = ReleaseGuard {
            registry: self.clone(),
            id,
            generation,
        };
        let handle = tokio::spawn(async move {
            let _guard = guard;
            task.await;
        });

        let superseded = {
            let mut registry = self.lock();
            match registry.in_flight.get(&id) {
                Some(current) if current.generation > generation => Some(handle.abort_handle()),
                _ => registry
                    .in_flight
                    .insert(
                        id,
                        InFlight {
                            generation,
                            task: handle.id(),
                            abort: handle.abort_handle(),
                        },
                    )
                    .filter(|previous| {
                        let handoff = tokio::task::try_id() == Some(previous.task);
                        if handoff {
                            tracing::trace!(effect_id = %id, "Slot handed to follow-up effect");
                        }
                        !handoff
                    })
                    .map(|previous| previous.abort),
            }
        };

        if let Some(abort) = superseded {
            abort.abort();
            tracing::debug!(effect_id = %id, "Superseded in-flight effect");
            metrics::counter!("store.effects.cancelled", "reason" => "superseded").increment(1);
        }
        handle
    }

    /// Abort the task registered under `id`
    ///
    /// Returns `true` if a task was registered.
    pub fn cancel(&self, id: EffectId) -> bool {
        let removed = self.lock().in_flight.remove(&id);
        match removed {
            Some(in_flight) => {
                in_flight.abort.abort();
                tracing::debug!(effect_id = %id, "Cancelled in-flight effect");
                metrics::counter!("store.effects.cancelled", "reason" => "explicit").increment(1);
                true
            },
            None => false,
        }
    }

    /// Abort every registered task
    pub fn cancel_all(&self) {
        let drained: Vec<_> = self.lock().in_flight.drain().collect();
        for (id, in_flight) in drained {
            in_flight.abort.abort();
            tracing::debug!(effect_id = %id, "Cancelled in-flight effect on shutdown");
        }
    }

    /// Whether a task currently occupies `id`
    #[must_use]
    pub fn is_in_flight(&self, id: EffectId) -> bool {
        self.lock()
            .in_flight
            .get(&id)
            .is_some_and(|in_flight| !in_flight.abort.is_finished())
    }

    fn release(&self, id: EffectId, generation: u64) {
        let mut registry = self.lock();
        if registry
            .in_flight
            .get(&id)
            .is_some_and(|in_flight| in_flight.generation == generation)
        {
            registry.in_flight.remove(&id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const SLOT: EffectId = EffectId::new("slot");

    #[tokio::test]
    async fn test_spawn_supersedes_previous_task() {
        let registry = CancellationRegistry::new();
        let finished = Arc::new(AtomicUsize::new(0));

        let first = {
            let finished = Arc::clone(&finished);
            registry.spawn(SLOT, async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                finished.fetch_add(1, Ordering::SeqCst);
            })
        };
        let second = {
            let finished = Arc::clone(&finished);
            registry.spawn(SLOT, async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                finished.fetch_add(10, Ordering::SeqCst);
            })
        };

        assert!(first.await.is_err_and(|e| e.is_cancelled()));
        assert!(second.await.is_ok());
        assert_eq!(finished.load(Ordering::SeqCst), 10);
        assert!(!registry.is_in_flight(SLOT));
    }

    #[tokio::test]
    async fn test_task_can_hand_its_slot_to_a_follow_up() {
        let registry = CancellationRegistry::new();
        let finished = Arc::new(AtomicUsize::new(0));

        let first = {
            let registry = registry.clone();
            let finished = Arc::clone(&finished);
            registry.clone().spawn(SLOT, async move {
                let follow_up = {
                    let finished = Arc::clone(&finished);
                    registry.spawn(SLOT, async move {
                        finished.fetch_add(10, Ordering::SeqCst);
                    })
                };
                tokio::task::yield_now().await;
                finished.fetch_add(1, Ordering::SeqCst);
                assert!(follow_up.await.is_ok());
            })
        };

        assert!(first.await.is_ok());
        assert_eq!(finished.load(Ordering::SeqCst), 11);
        assert!(!registry.is_in_flight(SLOT));
    }

    #[tokio::test]
    async fn test_cancel_aborts_and_reports() {
        let registry = CancellationRegistry::new();
        let handle = registry.spawn(SLOT, async {
            tokio::time::sleep(Duration::from_secs(60)).await;
        });

        assert!(registry.is_in_flight(SLOT));
        assert!(registry.cancel(SLOT));
        assert!(handle.await.is_err_and(|e| e.is_cancelled()));

        // Second cancel is a no-op
        assert!(!registry.cancel(SLOT));
    }
}
