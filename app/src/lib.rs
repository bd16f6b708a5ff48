//! # Mise App
//!
//! The application store: the session, the shopping list and the recipe
//! book composed under one reducer. Each feature reducer works on its own
//! slice of [`AppState`]; its effects are lifted back into [`AppAction`].
//!
//! The only cross-feature rule lives here: adding a recipe to the shopping
//! list appends that recipe's ingredients to the list.

use mise_core::effect::Effect;
use mise_core::environment::Clock;
use mise_core::reducer::Reducer;
use mise_core::{SmallVec, emit};
use mise_session::{
    FileSessionRepository, FirebaseIdentityClient, IdentityProvider, Navigator, RouteChannel,
    SessionAction, SessionConfig, SessionEnvironment, SessionReducer, SessionRepository,
    SessionState,
};
use mise_shopping::{
    EditCoordinator, RecipeAction, RecipeBookReducer, RecipeBookState, ShoppingListAction,
    ShoppingListEnvironment, ShoppingListReducer, ShoppingListState,
};
use std::sync::Arc;

/// Whole-application state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    /// Signed-in user and attempt bookkeeping.
    pub session: SessionState,

    /// The shopping list.
    pub shopping_list: ShoppingListState,

    /// The recipe book.
    pub recipes: RecipeBookState,
}

impl AppState {
    /// State of a fresh install: signed out, sample list and recipes.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            session: SessionState::default(),
            shopping_list: ShoppingListState::sample(),
            recipes: RecipeBookState::sample(),
        }
    }
}

/// Whole-application actions, one variant per feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Session action.
    Session(SessionAction),

    /// Shopping list action.
    ShoppingList(ShoppingListAction),

    /// Recipe book action.
    Recipes(RecipeAction),
}

/// Whole-application environment.
#[derive(Clone)]
pub struct AppEnvironment<I, P, N>
where
    I: IdentityProvider + Clone,
    P: SessionRepository + Clone,
    N: Navigator + Clone,
{
    /// Session dependencies.
    pub session: SessionEnvironment<I, P, N>,

    /// Shopping list dependencies.
    pub shopping_list: ShoppingListEnvironment,
}

impl<I, P, N> AppEnvironment<I, P, N>
where
    I: IdentityProvider + Clone,
    P: SessionRepository + Clone,
    N: Navigator + Clone,
{
    /// Create a new app environment.
    #[must_use]
    pub const fn new(
        session: SessionEnvironment<I, P, N>,
        shopping_list: ShoppingListEnvironment,
    ) -> Self {
        Self {
            session,
            shopping_list,
        }
    }
}

/// Environment backed by the identity service and the session file.
pub type LiveEnvironment =
    AppEnvironment<FirebaseIdentityClient, FileSessionRepository, RouteChannel>;

/// Reducer for the live environment.
pub type LiveReducer = AppReducer<FirebaseIdentityClient, FileSessionRepository, RouteChannel>;

impl LiveEnvironment {
    /// Wire the production dependencies from `config`.
    #[must_use]
    pub fn live(
        config: &SessionConfig,
        routes: RouteChannel,
        edits: EditCoordinator,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::new(
            SessionEnvironment::new(
                FirebaseIdentityClient::new(config.identity.clone()),
                FileSessionRepository::new(&config.session_file),
                routes,
                clock,
            ),
            ShoppingListEnvironment::new(edits),
        )
    }
}

/// Application reducer.
#[derive(Debug, Clone)]
pub struct AppReducer<I, P, N> {
    session: SessionReducer<I, P, N>,
    shopping_list: ShoppingListReducer,
    recipes: RecipeBookReducer,
}

impl<I, P, N> AppReducer<I, P, N> {
    /// Create a new app reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            session: SessionReducer::new(),
            shopping_list: ShoppingListReducer::new(),
            recipes: RecipeBookReducer::new(),
        }
    }
}

impl<I, P, N> Default for AppReducer<I, P, N> {
    fn default() -> Self {
        Self::new()
    }
}

fn lift<A, F>(effects: SmallVec<[Effect<A>; 4]>, f: F) -> SmallVec<[Effect<AppAction>; 4]>
where
    A: Send + 'static,
    F: Fn(A) -> AppAction + Clone + Send + Sync + 'static,
{
    effects.into_iter().map(|effect| effect.map(f.clone())).collect()
}

impl<I, P, N> Reducer for AppReducer<I, P, N>
where
    I: IdentityProvider + Clone + 'static,
    P: SessionRepository + Clone + 'static,
    N: Navigator + Clone + 'static,
{
    type State = AppState;
    type Action = AppAction;
    type Environment = AppEnvironment<I, P, N>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            AppAction::Session(action) => lift(
                self.session.reduce(&mut state.session, action, &env.session),
                AppAction::Session,
            ),

            AppAction::ShoppingList(action) => lift(
                self.shopping_list
                    .reduce(&mut state.shopping_list, action, &env.shopping_list),
                AppAction::ShoppingList,
            ),

            AppAction::Recipes(action) => {
                let ingredients = match &action {
                    RecipeAction::AddToShoppingList { index } => state
                        .recipes
                        .recipe(*index)
                        .map(|recipe| recipe.ingredients.clone()),
                    RecipeAction::SetRecipes { .. } => None,
                };

                let mut effects = lift(
                    self.recipes.reduce(&mut state.recipes, action, &()),
                    AppAction::Recipes,
                );

                if let Some(ingredients) = ingredients {
                    tracing::debug!(
                        count = ingredients.len(),
                        "Adding recipe ingredients to shopping list"
                    );
                    effects.push(emit!(AppAction::ShoppingList(
                        ShoppingListAction::AddIngredients { ingredients }
                    )));
                }
                effects
            },
        }
    }
}
