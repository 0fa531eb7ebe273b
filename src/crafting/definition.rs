//! Runic Altar Recipe Definitions
//!
//! A runic altar recipe turns up to 16 ingredients plus a mana cost into one
//! output stack. Recipes are authored as JSON and synced to clients in a
//! compact binary form.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::codec::{PacketReader, PacketWriter};
use crate::error::RecipeError;
use crate::item::{Container, ItemStack};
use crate::resource::ResourceLocation;
use crate::tags::TagLookup;

use super::ingredient::Ingredient;
use super::matching;

/// Most ingredients an altar can hold
pub const MAX_INGREDIENTS: usize = 16;

/// Value of the `type` field in recipe files
pub const RECIPE_TYPE: &str = "botania:runic_altar";

/// Item shown as the icon for recipes of this type
pub const RUNE_ALTAR_ITEM: &str = "botania:runic_altar";

// ============================================================================
// Raw JSON Structure
// ============================================================================

/// Raw recipe object from JSON; every field is checked in `from_json`
#[derive(Debug, Clone, Deserialize)]
struct RawRunicAltarRecipe {
    output: Option<Value>,
    mana: Option<i32>,
    ingredients: Option<Vec<Value>>,
}

// ============================================================================
// Resolved Structure
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct RunicAltarRecipe {
    id: ResourceLocation,
    output: ItemStack,
    inputs: Vec<Ingredient>,
    mana: i32,
}

impl RunicAltarRecipe {
    pub fn new(
        id: ResourceLocation,
        output: ItemStack,
        mana: i32,
        inputs: Vec<Ingredient>,
    ) -> Result<Self, RecipeError> {
        if inputs.len() > MAX_INGREDIENTS {
            return Err(RecipeError::InvalidArgument(format!(
                "Cannot have more than {} ingredients, recipe {} has {}",
                MAX_INGREDIENTS,
                id,
                inputs.len()
            )));
        }
        if mana < 0 {
            return Err(RecipeError::InvalidArgument(format!(
                "Mana cost cannot be negative, recipe {} costs {}",
                id, mana
            )));
        }
        if output.count < 1 {
            return Err(RecipeError::InvalidArgument(format!(
                "Output count must be at least 1, recipe {} makes {}",
                id, output.count
            )));
        }
        if let Some(index) = inputs.iter().position(Ingredient::is_empty) {
            return Err(RecipeError::InvalidArgument(format!(
                "Ingredient {} of recipe {} has no items or tags",
                index, id
            )));
        }
        Ok(Self {
            id,
            output,
            inputs,
            mana,
        })
    }

    pub fn id(&self) -> &ResourceLocation {
        &self.id
    }

    pub fn result_item(&self) -> &ItemStack {
        &self.output
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.inputs
    }

    pub fn mana_usage(&self) -> i32 {
        self.mana
    }

    pub fn toast_symbol(&self) -> ItemStack {
        ItemStack::new(ResourceLocation::from_static(RUNE_ALTAR_ITEM), 1)
    }

    /// Whether the container's occupied slots map one-to-one onto the ingredients
    pub fn matches(&self, container: &impl Container, tags: &impl TagLookup) -> bool {
        self.matching_slots(container, tags).is_some()
    }

    /// The slot consumed by each ingredient, in ingredient order
    pub fn matching_slots(
        &self,
        container: &impl Container,
        tags: &impl TagLookup,
    ) -> Option<Vec<usize>> {
        matching::find_assignment(&self.inputs, container, tags)
    }

    /// A fresh copy of the output. Consuming the inputs is up to the caller.
    pub fn assemble(&self, _container: &impl Container) -> ItemStack {
        self.output.clone()
    }

    // ------------------------------------------------------------------------
    // JSON
    // ------------------------------------------------------------------------

    pub fn from_json(id: ResourceLocation, json: &Value) -> Result<Self, RecipeError> {
        if !json.is_object() {
            return Err(RecipeError::malformed(format!(
                "recipe {} must be a JSON object",
                id
            )));
        }
        let raw: RawRunicAltarRecipe = serde_json::from_value(json.clone())
            .map_err(|e| RecipeError::malformed(format!("invalid recipe {}: {}", id, e)))?;

        let output = raw.output.ok_or_else(|| RecipeError::missing("output"))?;
        let mana = raw.mana.ok_or_else(|| RecipeError::missing("mana"))?;
        let ingredients = raw
            .ingredients
            .ok_or_else(|| RecipeError::missing("ingredients"))?;

        let output = ItemStack::from_json(&output)?;
        let inputs = ingredients
            .iter()
            .map(Ingredient::from_json)
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(id, output, mana, inputs)
    }

    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("type".to_string(), Value::String(RECIPE_TYPE.to_string()));
        obj.insert("output".to_string(), self.output.to_json());
        obj.insert("mana".to_string(), Value::from(self.mana));
        obj.insert(
            "ingredients".to_string(),
            Value::Array(self.inputs.iter().map(Ingredient::to_json).collect()),
        );
        Value::Object(obj)
    }

    // ------------------------------------------------------------------------
    // Network
    // ------------------------------------------------------------------------

    /// `[varint count][count × ingredient][output stack][varint mana]`
    pub fn to_network(&self, writer: &mut PacketWriter) -> Result<(), RecipeError> {
        writer.write_len(self.inputs.len())?;
        for input in &self.inputs {
            input.to_network(writer)?;
        }
        self.output.to_network(writer)?;
        writer.write_var_int(self.mana);
        Ok(())
    }

    pub fn from_network(
        id: ResourceLocation,
        reader: &mut PacketReader<'_>,
    ) -> Result<Self, RecipeError> {
        let count = reader.read_len()?;
        if count > MAX_INGREDIENTS {
            return Err(RecipeError::InvalidArgument(format!(
                "Cannot have more than {} ingredients, recipe {} has {}",
                MAX_INGREDIENTS, id, count
            )));
        }

        let mut inputs = Vec::with_capacity(count);
        for _ in 0..count {
            inputs.push(Ingredient::from_network(reader)?);
        }
        let output = ItemStack::from_network(reader)?;
        let mana = reader.read_var_int()?;

        Self::new(id, output, mana, inputs)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, RecipeError> {
        let mut writer = PacketWriter::new();
        self.to_network(&mut writer)?;
        Ok(writer.into_bytes())
    }

    /// Decode a single recipe; the whole buffer must be consumed
    pub fn from_bytes(id: ResourceLocation, bytes: &[u8]) -> Result<Self, RecipeError> {
        let mut reader = PacketReader::new(bytes);
        let recipe = Self::from_network(id, &mut reader)?;
        reader.finish()?;
        Ok(recipe)
    }
}
