//! Shopping list actions.

use crate::ingredient::Ingredient;

/// Everything that can happen to the shopping list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShoppingListAction {
    /// Append one entry.
    AddIngredient {
        /// Entry to append.
        ingredient: Ingredient,
    },

    /// Append several entries, keeping their order.
    AddIngredients {
        /// Entries to append.
        ingredients: Vec<Ingredient>,
    },

    /// Replace the entry at `index`.
    UpdateIngredient {
        /// Position of the entry.
        index: usize,
        /// Replacement.
        ingredient: Ingredient,
    },

    /// Remove the entry at `index`; later entries move up.
    DeleteIngredient {
        /// Position of the entry.
        index: usize,
    },

    /// Begin editing the entry at `index`.
    StartEdit {
        /// Position of the entry.
        index: usize,
    },

    /// Abandon the current edit.
    StopEdit,

    /// Commit the edit form.
    ///
    /// Replaces the entry being edited, or appends when nothing is being
    /// edited. Ends the edit either way.
    SubmitIngredient {
        /// Form contents.
        ingredient: Ingredient,
    },

    /// Delete the entry being edited.
    DeleteEditedIngredient,
}
