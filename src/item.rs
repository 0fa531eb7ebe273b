//! Item stacks and the containers that hold them.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::codec::{PacketReader, PacketWriter};
use crate::error::RecipeError;
use crate::resource::ResourceLocation;

// ============================================================================
// Item Stack
// ============================================================================

/// An item id with a count and optional auxiliary data
#[derive(Debug, Clone, PartialEq)]
pub struct ItemStack {
    pub item: ResourceLocation,
    pub count: i32,
    pub data: Option<Map<String, Value>>,
}

impl ItemStack {
    pub fn new(item: ResourceLocation, count: i32) -> Self {
        Self {
            item,
            count,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = Some(data);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.count <= 0
    }

    // ------------------------------------------------------------------------
    // JSON
    // ------------------------------------------------------------------------

    /// Read a stack from a JSON object with `item`, optional `count` and
    /// optional `nbt` (an object, or a string holding a JSON object).
    pub fn from_json(json: &Value) -> Result<Self, RecipeError> {
        if !json.is_object() {
            return Err(RecipeError::malformed("item stack must be a JSON object"));
        }
        let raw: RawItemStack = serde_json::from_value(json.clone())
            .map_err(|e| RecipeError::malformed(format!("invalid item stack: {}", e)))?;
        let item = raw.item.ok_or_else(|| RecipeError::missing("item"))?;
        let count = raw.count.unwrap_or(1);
        if count < 1 {
            return Err(RecipeError::malformed(format!(
                "item stack count must be at least 1, got {}",
                count
            )));
        }
        let data = match raw.nbt {
            None => None,
            Some(RawItemData::Object(map)) => Some(map),
            Some(RawItemData::Text(text)) => Some(
                serde_json::from_str(&text)
                    .map_err(|e| RecipeError::malformed(format!("invalid nbt string: {}", e)))?,
            ),
        };
        Ok(Self { item, count, data })
    }

    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("item".to_string(), Value::String(self.item.to_string()));
        obj.insert("count".to_string(), Value::from(self.count));
        if let Some(data) = &self.data {
            obj.insert("nbt".to_string(), Value::Object(data.clone()));
        }
        Value::Object(obj)
    }

    // ------------------------------------------------------------------------
    // Network
    // ------------------------------------------------------------------------

    pub fn to_network(&self, writer: &mut PacketWriter) -> Result<(), RecipeError> {
        writer.write_resource_location(&self.item)?;
        writer.write_var_int(self.count);
        match &self.data {
            Some(data) => {
                writer.write_bool(true);
                let bytes = rmp_serde::to_vec(data)
                    .map_err(|e| RecipeError::malformed(format!("failed to encode item data: {}", e)))?;
                writer.write_bytes(&bytes)?;
            }
            None => writer.write_bool(false),
        }
        Ok(())
    }

    pub fn from_network(reader: &mut PacketReader<'_>) -> Result<Self, RecipeError> {
        let item = reader.read_resource_location()?;
        let count = reader.read_var_int()?;
        if count < 1 {
            return Err(RecipeError::malformed(format!(
                "item stack count must be at least 1, got {}",
                count
            )));
        }
        let data = if reader.read_bool()? {
            let bytes = reader.read_bytes()?;
            Some(
                rmp_serde::from_slice(bytes)
                    .map_err(|e| RecipeError::malformed(format!("failed to decode item data: {}", e)))?,
            )
        } else {
            None
        };
        Ok(Self { item, count, data })
    }
}

#[derive(Debug, Deserialize)]
struct RawItemStack {
    item: Option<ResourceLocation>,
    count: Option<i32>,
    nbt: Option<RawItemData>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawItemData {
    Object(Map<String, Value>),
    Text(String),
}

// ============================================================================
// Containers
// ============================================================================

/// Slot-indexed view of an inventory, supplied by whoever owns the altar
pub trait Container {
    fn size(&self) -> usize;

    /// The stack in `slot`, or `None` if the slot is empty or out of range
    fn item(&self, slot: usize) -> Option<&ItemStack>;

    fn is_empty(&self) -> bool {
        (0..self.size()).all(|slot| self.item(slot).is_none())
    }
}

/// Fixed-size container backed by a vector of optional stacks
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SlotContainer {
    slots: Vec<Option<ItemStack>>,
}

impl SlotContainer {
    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![None; size],
        }
    }

    /// One slot per stack, in order
    pub fn from_stacks(stacks: impl IntoIterator<Item = ItemStack>) -> Self {
        Self {
            slots: stacks.into_iter().map(Some).collect(),
        }
    }

    /// Put a stack into a slot. Returns the previous contents.
    pub fn set(&mut self, slot: usize, stack: Option<ItemStack>) -> Option<ItemStack> {
        let stack = stack.filter(|s| !s.is_empty());
        match self.slots.get_mut(slot) {
            Some(existing) => std::mem::replace(existing, stack),
            None => None,
        }
    }

    pub fn take(&mut self, slot: usize) -> Option<ItemStack> {
        self.slots.get_mut(slot).and_then(Option::take)
    }
}

impl Container for SlotContainer {
    fn size(&self) -> usize {
        self.slots.len()
    }

    fn item(&self, slot: usize) -> Option<&ItemStack> {
        self.slots
            .get(slot)
            .and_then(Option::as_ref)
            .filter(|s| !s.is_empty())
    }
}
