//! # Mise Shopping
//!
//! The shopping list, the edit session shared between the list and its edit
//! form, and the recipe book that feeds ingredients into the list.
//!
//! ## Example
//!
//! ```rust,ignore
//! use mise_shopping::*;
//! use mise_runtime::Store;
//!
//! let edits = EditCoordinator::new();
//! let mut form = edits.subscribe();
//! let store = Store::new(
//!     ShoppingListState::sample(),
//!     ShoppingListReducer::new(),
//!     ShoppingListEnvironment::new(edits),
//! );
//!
//! store.send(ShoppingListAction::StartEdit { index: 0 }).await?;
//! form.changed().await?;
//! ```

pub mod actions;
pub mod edit;
pub mod error;
pub mod ingredient;
pub mod recipes;
pub mod reducer;
pub mod state;

pub use actions::ShoppingListAction;
pub use edit::{EditCoordinator, EditTarget};
pub use error::ShoppingListError;
pub use ingredient::Ingredient;
pub use recipes::{Recipe, RecipeAction, RecipeBookReducer, RecipeBookState};
pub use reducer::{EDIT_ANNOUNCEMENT, ShoppingListEnvironment, ShoppingListReducer};
pub use state::ShoppingListState;
