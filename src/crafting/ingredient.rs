//! Ingredient matchers.
//!
//! An ingredient is a list of alternatives; an item stack satisfies it when
//! it is one of the listed items or belongs to one of the listed tags.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::codec::{PacketReader, PacketWriter};
use crate::error::RecipeError;
use crate::item::ItemStack;
use crate::resource::ResourceLocation;
use crate::tags::TagLookup;

const KIND_ITEM: u8 = 0;
const KIND_TAG: u8 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngredientValue {
    Item(ResourceLocation),
    Tag(ResourceLocation),
}

impl IngredientValue {
    fn test(&self, stack: &ItemStack, tags: &impl TagLookup) -> bool {
        match self {
            IngredientValue::Item(id) => *id == stack.item,
            IngredientValue::Tag(tag) => tags.is_in_tag(tag, &stack.item),
        }
    }

    fn to_json(&self) -> Value {
        let mut obj = Map::new();
        match self {
            IngredientValue::Item(id) => obj.insert("item".to_string(), Value::String(id.to_string())),
            IngredientValue::Tag(id) => obj.insert("tag".to_string(), Value::String(id.to_string())),
        };
        Value::Object(obj)
    }
}

/// Recipes only hold ingredients with at least one alternative; both
/// codecs reject one without any.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ingredient {
    values: Vec<IngredientValue>,
}

impl Ingredient {
    pub fn new(values: Vec<IngredientValue>) -> Self {
        Self { values }
    }

    pub fn of_item(item: ResourceLocation) -> Self {
        Self::new(vec![IngredientValue::Item(item)])
    }

    pub fn of_items(items: impl IntoIterator<Item = ResourceLocation>) -> Self {
        Self::new(items.into_iter().map(IngredientValue::Item).collect())
    }

    pub fn of_tag(tag: ResourceLocation) -> Self {
        Self::new(vec![IngredientValue::Tag(tag)])
    }

    pub fn values(&self) -> &[IngredientValue] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether `stack` satisfies this ingredient. Count and data are ignored.
    pub fn test(&self, stack: &ItemStack, tags: &impl TagLookup) -> bool {
        !stack.is_empty() && self.values.iter().any(|v| v.test(stack, tags))
    }

    // ------------------------------------------------------------------------
    // JSON
    // ------------------------------------------------------------------------

    /// Accepts `{"item": id}`, `{"tag": id}` or a non-empty array of those
    pub fn from_json(json: &Value) -> Result<Self, RecipeError> {
        let values = match json {
            Value::Object(_) => vec![RawIngredientValue::parse(json)?],
            Value::Array(entries) => {
                if entries.is_empty() {
                    return Err(RecipeError::malformed(
                        "ingredient array cannot be empty, at least one item must be defined",
                    ));
                }
                entries
                    .iter()
                    .map(RawIngredientValue::parse)
                    .collect::<Result<Vec<_>, _>>()?
            }
            other => {
                return Err(RecipeError::malformed(format!(
                    "ingredient must be an object or an array, got {}",
                    other
                )));
            }
        };

        Ok(Self { values })
    }

    pub fn to_json(&self) -> Value {
        match self.values.as_slice() {
            [single] => single.to_json(),
            values => Value::Array(values.iter().map(IngredientValue::to_json).collect()),
        }
    }

    // ------------------------------------------------------------------------
    // Network
    // ------------------------------------------------------------------------

    pub fn to_network(&self, writer: &mut PacketWriter) -> Result<(), RecipeError> {
        writer.write_len(self.values.len())?;
        for value in &self.values {
            match value {
                IngredientValue::Item(id) => {
                    writer.write_u8(KIND_ITEM);
                    writer.write_resource_location(id)?;
                }
                IngredientValue::Tag(id) => {
                    writer.write_u8(KIND_TAG);
                    writer.write_resource_location(id)?;
                }
            }
        }
        Ok(())
    }

    pub fn from_network(reader: &mut PacketReader<'_>) -> Result<Self, RecipeError> {
        let count = reader.read_len()?;
        if count == 0 {
            return Err(RecipeError::malformed("ingredient has no items or tags"));
        }
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            let value = match reader.read_u8()? {
                KIND_ITEM => IngredientValue::Item(reader.read_resource_location()?),
                KIND_TAG => IngredientValue::Tag(reader.read_resource_location()?),
                other => {
                    return Err(RecipeError::malformed(format!(
                        "unknown ingredient kind {}",
                        other
                    )));
                }
            };
            values.push(value);
        }
        Ok(Self { values })
    }
}

#[derive(Debug, Deserialize)]
struct RawIngredientValue {
    item: Option<ResourceLocation>,
    tag: Option<ResourceLocation>,
}

impl RawIngredientValue {
    fn parse(json: &Value) -> Result<IngredientValue, RecipeError> {
        if !json.is_object() {
            return Err(RecipeError::malformed(format!(
                "ingredient entry must be an object, got {}",
                json
            )));
        }
        let raw: RawIngredientValue = serde_json::from_value(json.clone())
            .map_err(|e| RecipeError::malformed(format!("invalid ingredient: {}", e)))?;
        raw.resolve()
    }

    fn resolve(self) -> Result<IngredientValue, RecipeError> {
        match (self.item, self.tag) {
            (Some(item), None) => Ok(IngredientValue::Item(item)),
            (None, Some(tag)) => Ok(IngredientValue::Tag(tag)),
            (Some(_), Some(_)) => Err(RecipeError::malformed(
                "ingredient entry cannot be both an item and a tag",
            )),
            (None, None) => Err(RecipeError::malformed(
                "ingredient entry needs either 'item' or 'tag'",
            )),
        }
    }
}
