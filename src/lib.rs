//! Runic altar recipes: shapeless ingredient matching against an altar's
//! contents, plus the JSON form recipes are written in and the binary form
//! they are synced to clients in.

pub mod codec;
pub mod config;
pub mod crafting;
pub mod datapack;
pub mod error;
pub mod item;
pub mod resource;
pub mod tags;

pub use crafting::{AltarRecipeRegistry, Ingredient, RunicAltarRecipe};
pub use error::RecipeError;
pub use item::{Container, ItemStack, SlotContainer};
pub use resource::ResourceLocation;
pub use tags::{NoTags, TagLookup, TagRegistry};
