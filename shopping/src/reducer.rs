//! Shopping list reducer.
//!
//! Index-addressed mutations are validated first; a refused action leaves
//! the entries untouched and records why in `last_error`. Whenever a
//! reduction changes what the edit form should show, the new edit target is
//! announced through the [`EditCoordinator`].
//!
//! Edit conflicts are resolved in the reducer:
//! - deleting or updating the edited entry ends the edit
//! - deleting an entry above the edited one moves the edit up with it
//! - appends never move the edit

use crate::actions::ShoppingListAction;
use crate::edit::{EditCoordinator, EditTarget};
use crate::error::ShoppingListError;
use crate::ingredient::Ingredient;
use crate::state::ShoppingListState;
use mise_core::effect::{Effect, EffectId};
use mise_core::reducer::Reducer;
use mise_core::{SmallVec, async_effect, smallvec};

/// Slot of the pending edit announcement.
///
/// A newer announcement aborts one that has not been delivered yet, so the
/// coordinator always ends on the latest target.
pub const EDIT_ANNOUNCEMENT: EffectId = EffectId::new("shopping_list.edit_announcement");

/// Environment for the shopping list reducer.
#[derive(Debug, Clone, Default)]
pub struct ShoppingListEnvironment {
    /// Where edit targets are announced.
    pub edits: EditCoordinator,
}

impl ShoppingListEnvironment {
    /// Create an environment announcing through `edits`.
    #[must_use]
    pub const fn new(edits: EditCoordinator) -> Self {
        Self { edits }
    }
}

/// Shopping list reducer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShoppingListReducer;

impl ShoppingListReducer {
    /// Create a new shopping list reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn update(
        state: &mut ShoppingListState,
        index: usize,
        ingredient: Ingredient,
    ) -> Result<(), ShoppingListError> {
        state.check_index(index)?;
        state.ingredients[index] = ingredient;
        if state.edited_index == Some(index) {
            state.edited_index = None;
        }
        Ok(())
    }

    fn delete(state: &mut ShoppingListState, index: usize) -> Result<(), ShoppingListError> {
        state.check_index(index)?;
        let removed = state.ingredients.remove(index);
        tracing::debug!(index, ingredient = %removed, "Removed ingredient");

        state.edited_index = match state.edited_index {
            Some(edited) if edited == index => None,
            Some(edited) if edited > index => Some(edited - 1),
            other => other,
        };
        Ok(())
    }

    fn start_edit(state: &mut ShoppingListState, index: usize) -> Result<(), ShoppingListError> {
        state.check_index(index)?;
        state.edited_index = Some(index);
        Ok(())
    }

    fn apply(
        state: &mut ShoppingListState,
        action: ShoppingListAction,
    ) -> Result<(), ShoppingListError> {
        match action {
            ShoppingListAction::AddIngredient { ingredient } => {
                state.ingredients.push(ingredient);
                Ok(())
            },
            ShoppingListAction::AddIngredients { ingredients } => {
                state.ingredients.extend(ingredients);
                Ok(())
            },
            ShoppingListAction::UpdateIngredient { index, ingredient } => {
                Self::update(state, index, ingredient)
            },
            ShoppingListAction::DeleteIngredient { index } => Self::delete(state, index),
            ShoppingListAction::StartEdit { index } => Self::start_edit(state, index),
            ShoppingListAction::StopEdit => {
                state.edited_index = None;
                Ok(())
            },
            ShoppingListAction::SubmitIngredient { ingredient } => match state.edited_index {
                Some(index) => Self::update(state, index, ingredient),
                None => {
                    state.ingredients.push(ingredient);
                    Ok(())
                },
            },
            ShoppingListAction::DeleteEditedIngredient => match state.edited_index {
                Some(index) => Self::delete(state, index),
                None => Err(ShoppingListError::NotEditing),
            },
        }
    }
}

/// Announce `target` on the coordinator.
fn announce_edit(
    edits: &EditCoordinator,
    target: Option<EditTarget>,
) -> Effect<ShoppingListAction> {
    let edits = edits.clone();
    let announce = async_effect! {
        edits.publish(target);
        None
    };
    announce.cancellable(EDIT_ANNOUNCEMENT)
}

impl Reducer for ShoppingListReducer {
    type State = ShoppingListState;
    type Action = ShoppingListAction;
    type Environment = ShoppingListEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let before = state.edit_target();

        match Self::apply(state, action) {
            Ok(()) => state.last_error = None,
            Err(error) => {
                tracing::warn!(%error, "Shopping list action refused");
                state.last_error = Some(error);
                return smallvec![Effect::None];
            },
        }

        let after = state.edit_target();
        if after == before {
            smallvec![Effect::None]
        } else {
            smallvec![announce_edit(&env.edits, after)]
        }
    }
}
