//! Edit-session coordinator.
//!
//! Announces which shopping-list entry is open in the edit form. The list
//! component publishes through [`EditCoordinator::begin`] and
//! [`EditCoordinator::stop`]; the form subscribes and pre-fills itself.
//! The coordinator holds nothing but the latest announcement.

use crate::ingredient::Ingredient;
use std::sync::Arc;
use tokio::sync::watch;

/// The entry being edited, with its contents at the time editing began.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTarget {
    /// Position in the shopping list.
    pub index: usize,

    /// Contents to pre-fill the form with.
    pub ingredient: Ingredient,
}

/// Broadcasts the current edit target to any number of subscribers.
///
/// Cloning shares the channel.
#[derive(Debug, Clone)]
pub struct EditCoordinator {
    sender: Arc<watch::Sender<Option<EditTarget>>>,
}

impl EditCoordinator {
    /// Create a coordinator with no edit in progress.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Announce that `target` is being edited.
    pub fn begin(&self, target: EditTarget) {
        self.publish(Some(target));
    }

    /// Announce that nothing is being edited.
    pub fn stop(&self) {
        self.publish(None);
    }

    /// Replace the announcement.
    ///
    /// Subscribers are only woken when the value actually changes.
    pub fn publish(&self, target: Option<EditTarget>) {
        self.sender.send_if_modified(|current| {
            if *current == target {
                false
            } else {
                *current = target;
                true
            }
        });
    }

    /// Latest announcement.
    #[must_use]
    pub fn current(&self) -> Option<EditTarget> {
        self.sender.borrow().clone()
    }

    /// Receive future announcements.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<EditTarget>> {
        self.sender.subscribe()
    }
}

impl Default for EditCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
