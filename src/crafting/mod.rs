//! Runic Altar Crafting
//!
//! Ingredient matchers, the runic altar recipe type and a registry for
//! loaded recipes.

pub mod definition;
pub mod ingredient;
pub mod matching;
pub mod registry;

pub use definition::{MAX_INGREDIENTS, RECIPE_TYPE, RUNE_ALTAR_ITEM, RunicAltarRecipe};
pub use ingredient::{Ingredient, IngredientValue};
pub use registry::AltarRecipeRegistry;
