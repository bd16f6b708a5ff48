//! Recipe book.
//!
//! Recipes are read-mostly: the list is replaced wholesale when a fresh copy
//! arrives. Moving a recipe's ingredients into the shopping list crosses
//! features, so [`RecipeAction::AddToShoppingList`] is routed by the app
//! reducer; here it only checks the index.

use crate::ingredient::Ingredient;
use mise_core::effect::Effect;
use mise_core::reducer::Reducer;
use mise_core::{SmallVec, smallvec};
use serde::{Deserialize, Serialize};

const SAMPLE_IMAGE: &str =
    "https://okdiario.com/img/2019/07/09/pollo-asado-con-brandy-655x368.jpg";

/// A recipe and what it takes to cook it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Title.
    pub name: String,

    /// Free-form description.
    pub description: String,

    /// Picture of the dish.
    pub image_path: String,

    /// Ingredients, in recipe order.
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
}

impl Recipe {
    /// Create a recipe.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        image_path: impl Into<String>,
        ingredients: Vec<Ingredient>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            image_path: image_path.into(),
            ingredients,
        }
    }
}

/// The recipe book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeBookState {
    /// Recipes in display order.
    pub recipes: Vec<Recipe>,
}

impl RecipeBookState {
    /// The recipes a fresh install starts with.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            recipes: vec![
                Recipe::new(
                    "A Test Recipe",
                    "test",
                    SAMPLE_IMAGE,
                    vec![Ingredient::new("Meat", 1), Ingredient::new("French Fries", 20)],
                ),
                Recipe::new(
                    "A Test Recipe2",
                    "test2",
                    SAMPLE_IMAGE,
                    vec![Ingredient::new("Buns", 2), Ingredient::new("Meat", 1)],
                ),
            ],
        }
    }

    /// Recipe at `index`.
    #[must_use]
    pub fn recipe(&self, index: usize) -> Option<&Recipe> {
        self.recipes.get(index)
    }
}

/// Recipe book actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeAction {
    /// Replace every recipe.
    SetRecipes {
        /// New recipe list.
        recipes: Vec<Recipe>,
    },

    /// Copy the ingredients of the recipe at `index` into the shopping list.
    AddToShoppingList {
        /// Position of the recipe.
        index: usize,
    },
}

/// Recipe book reducer.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecipeBookReducer;

impl RecipeBookReducer {
    /// Create a new recipe book reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for RecipeBookReducer {
    type State = RecipeBookState;
    type Action = RecipeAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            RecipeAction::SetRecipes { recipes } => {
                tracing::debug!(count = recipes.len(), "Replacing recipes");
                state.recipes = recipes;
            },
            RecipeAction::AddToShoppingList { index } => {
                if state.recipe(index).is_none() {
                    tracing::warn!(index, count = state.recipes.len(), "No recipe at index");
                }
            },
        }

        smallvec![Effect::None]
    }
}
