//! Shopping list state.

use crate::edit::EditTarget;
use crate::error::ShoppingListError;
use crate::ingredient::Ingredient;

/// The shopping list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingListState {
    /// Entries in display order. Duplicates allowed.
    pub ingredients: Vec<Ingredient>,

    /// Entry open in the edit form, if any.
    ///
    /// Always a valid index into `ingredients` when set.
    pub edited_index: Option<usize>,

    /// Why the last refused action was refused.
    ///
    /// Cleared by the next successful mutation.
    pub last_error: Option<ShoppingListError>,
}

impl ShoppingListState {
    /// Create a list holding `ingredients`.
    #[must_use]
    pub const fn new(ingredients: Vec<Ingredient>) -> Self {
        Self {
            ingredients,
            edited_index: None,
            last_error: None,
        }
    }

    /// The list a fresh install starts with.
    #[must_use]
    pub fn sample() -> Self {
        Self::new(vec![
            Ingredient::new("Apples", 5),
            Ingredient::new("Tomatoes", 5),
        ])
    }

    /// Entry at `index`.
    #[must_use]
    pub fn ingredient_at(&self, index: usize) -> Option<&Ingredient> {
        self.ingredients.get(index)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }

    /// What the edit form should show.
    #[must_use]
    pub fn edit_target(&self) -> Option<EditTarget> {
        let index = self.edited_index?;
        self.ingredient_at(index).map(|ingredient| EditTarget {
            index,
            ingredient: ingredient.clone(),
        })
    }

    /// Check that `index` names an entry.
    ///
    /// # Errors
    ///
    /// Returns [`ShoppingListError::IndexOutOfRange`] when it does not.
    pub fn check_index(&self, index: usize) -> Result<(), ShoppingListError> {
        if index < self.ingredients.len() {
            Ok(())
        } else {
            Err(ShoppingListError::IndexOutOfRange {
                index,
                len: self.ingredients.len(),
            })
        }
    }
}
