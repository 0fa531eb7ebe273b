//! Runic Altar Recipe Registry
//!
//! Loads recipe definitions from JSON files, answers "what does this altar
//! make" lookups and builds the recipe sync payload for clients.

use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

use serde_json::Value;

use crate::codec::{PacketReader, PacketWriter};
use crate::datapack;
use crate::error::RecipeError;
use crate::item::Container;
use crate::resource::ResourceLocation;
use crate::tags::{TagLookup, TagRegistry};

use super::definition::{RECIPE_TYPE, RunicAltarRecipe};
use super::ingredient::IngredientValue;

/// Registry for all runic altar recipes, ordered by id
pub struct AltarRecipeRegistry {
    recipes: BTreeMap<ResourceLocation, RunicAltarRecipe>,
}

impl AltarRecipeRegistry {
    pub fn new() -> Self {
        Self {
            recipes: BTreeMap::new(),
        }
    }

    /// Load all runic altar recipes below `data_dir/recipes`.
    ///
    /// Files whose `type` is some other recipe type are skipped.
    pub fn load_from_directory(&mut self, data_dir: &Path) -> Result<(), RecipeError> {
        let recipes_dir = data_dir.join("recipes");

        if !recipes_dir.exists() {
            warn!("Recipes directory does not exist: {:?}", recipes_dir);
            return Ok(());
        }

        let mut skipped = 0;
        for path in datapack::collect_json_files(&recipes_dir)? {
            let content = std::fs::read_to_string(&path).map_err(|e| RecipeError::io(&path, e))?;
            let json: Value = serde_json::from_str(&content)
                .map_err(|e| RecipeError::malformed(format!("failed to parse {:?}: {}", path, e)))?;

            if json.get("type").and_then(Value::as_str) != Some(RECIPE_TYPE) {
                debug!("Skipping {:?}: not a {} recipe", path, RECIPE_TYPE);
                skipped += 1;
                continue;
            }

            let id = datapack::id_from_path(&recipes_dir, &path)?;
            let recipe = RunicAltarRecipe::from_json(id, &json).map_err(|e| match e {
                RecipeError::MissingField(field) => {
                    RecipeError::MissingField(format!("{} (in {:?})", field, path))
                }
                RecipeError::MalformedData(msg) => {
                    RecipeError::MalformedData(format!("{} (in {:?})", msg, path))
                }
                RecipeError::InvalidArgument(msg) => {
                    RecipeError::InvalidArgument(format!("{} (in {:?})", msg, path))
                }
                other => other,
            })?;

            info!(
                "Loaded recipe: {} - {} ingredients -> {} x{} for {} mana",
                recipe.id(),
                recipe.ingredients().len(),
                recipe.result_item().item,
                recipe.result_item().count,
                recipe.mana_usage()
            );
            self.insert(recipe);
        }

        info!(
            "Loaded {} runic altar recipes ({} other files skipped)",
            self.recipes.len(),
            skipped
        );

        Ok(())
    }

    /// Add a recipe, replacing any recipe with the same id
    pub fn insert(&mut self, recipe: RunicAltarRecipe) {
        if self.recipes.contains_key(recipe.id()) {
            warn!("Duplicate recipe ID '{}', overwriting", recipe.id());
        }
        self.recipes.insert(recipe.id().clone(), recipe);
    }

    /// Get a recipe by ID
    pub fn get(&self, id: &ResourceLocation) -> Option<&RunicAltarRecipe> {
        self.recipes.get(id)
    }

    /// Get all recipe IDs
    pub fn ids(&self) -> impl Iterator<Item = &ResourceLocation> {
        self.recipes.keys()
    }

    /// Get all recipes
    pub fn all(&self) -> impl Iterator<Item = &RunicAltarRecipe> {
        self.recipes.values()
    }

    /// Check if a recipe exists
    pub fn contains(&self, id: &ResourceLocation) -> bool {
        self.recipes.contains_key(id)
    }

    /// Get the number of loaded recipes
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Drop every recipe, e.g. before a reload
    pub fn clear(&mut self) {
        self.recipes.clear();
    }

    /// First recipe (by id) that the altar contents satisfy
    pub fn find_match(
        &self,
        container: &impl Container,
        tags: &impl TagLookup,
    ) -> Option<&RunicAltarRecipe> {
        self.recipes.values().find(|r| r.matches(container, tags))
    }

    /// Warn about ingredients naming tags that `tags` does not define.
    /// Returns how many such references were found.
    pub fn check_tags(&self, tags: &TagRegistry) -> usize {
        let mut unknown = 0;
        for recipe in self.recipes.values() {
            for value in recipe.ingredients().iter().flat_map(|i| i.values()) {
                if let IngredientValue::Tag(tag) = value {
                    if !tags.contains(tag) {
                        warn!("Recipe {} uses unknown tag #{}", recipe.id(), tag);
                        unknown += 1;
                    }
                }
            }
        }
        unknown
    }

    // ------------------------------------------------------------------------
    // Client sync
    // ------------------------------------------------------------------------

    /// `[varint n][n × (string id, recipe)]` in id order
    pub fn to_network(&self) -> Result<Vec<u8>, RecipeError> {
        let mut writer = PacketWriter::new();
        writer.write_len(self.recipes.len())?;
        for (id, recipe) in &self.recipes {
            writer.write_resource_location(id)?;
            recipe.to_network(&mut writer)?;
        }
        Ok(writer.into_bytes())
    }

    pub fn from_network(bytes: &[u8]) -> Result<Self, RecipeError> {
        let mut reader = PacketReader::new(bytes);
        let count = reader.read_len()?;

        let mut registry = Self::new();
        for _ in 0..count {
            let id = reader.read_resource_location()?;
            let recipe = RunicAltarRecipe::from_network(id, &mut reader)?;
            registry.insert(recipe);
        }
        reader.finish()?;

        Ok(registry)
    }
}

impl Default for AltarRecipeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
