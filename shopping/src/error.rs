//! Shopping list errors.

use thiserror::Error;

/// Why a shopping-list action was refused.
///
/// Refused actions leave the list untouched; the error is recorded in
/// [`ShoppingListState::last_error`](crate::state::ShoppingListState::last_error).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShoppingListError {
    /// The index does not name an entry.
    #[error("Index {index} is out of range for a list of {len} ingredients")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// List length at the time.
        len: usize,
    },

    /// The action needs an edit in progress and there is none.
    #[error("No ingredient is being edited")]
    NotEditing,
}
