//! Ingredient value type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named amount of something to buy.
///
/// Value type: two ingredients are equal when name and amount are.
/// Zero amounts are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ingredient {
    /// What to buy.
    pub name: String,

    /// How many.
    pub amount: u32,
}

impl Ingredient {
    /// Create an ingredient.
    #[must_use]
    pub fn new(name: impl Into<String>, amount: u32) -> Self {
        Self {
            name: name.into(),
            amount,
        }
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.amount)
    }
}
