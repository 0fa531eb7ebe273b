//! Item Tags
//!
//! Named groups of items that ingredients can match against. Tags are loaded
//! from `<data_dir>/tags/items/<namespace>/<path>.json` files of the form
//! `{"replace": false, "values": ["ns:item", "#ns:other_tag"]}` and can also be
//! built in code and written back out as data files.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::datapack;
use crate::error::RecipeError;
use crate::resource::ResourceLocation;

/// Tag membership as seen by ingredient matching
pub trait TagLookup {
    fn is_in_tag(&self, tag: &ResourceLocation, item: &ResourceLocation) -> bool;
}

/// A lookup with no tags at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTags;

impl TagLookup for NoTags {
    fn is_in_tag(&self, _tag: &ResourceLocation, _item: &ResourceLocation) -> bool {
        false
    }
}

// ============================================================================
// Tag Entries
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum TagEntry {
    Item(ResourceLocation),
    Tag(ResourceLocation),
}

impl TagEntry {
    fn parse(value: &str) -> Result<Self, RecipeError> {
        match value.strip_prefix('#') {
            Some(tag) => Ok(TagEntry::Tag(tag.parse()?)),
            None => Ok(TagEntry::Item(value.parse()?)),
        }
    }

    fn to_value(&self) -> String {
        match self {
            TagEntry::Item(id) => id.to_string(),
            TagEntry::Tag(id) => format!("#{}", id),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct RawTagFile {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    values: Vec<String>,
}

// ============================================================================
// Registry
// ============================================================================

#[derive(Debug, Default)]
pub struct TagRegistry {
    tags: BTreeMap<ResourceLocation, Vec<TagEntry>>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self {
            tags: BTreeMap::new(),
        }
    }

    /// Load all item tags below `data_dir/tags/items`, then check references
    pub fn load_from_directory(&mut self, data_dir: &Path) -> Result<(), RecipeError> {
        let tags_dir = data_dir.join("tags").join("items");

        if !tags_dir.exists() {
            warn!("Tags directory does not exist: {:?}", tags_dir);
            return Ok(());
        }

        for path in datapack::collect_json_files(&tags_dir)? {
            let id = datapack::id_from_path(&tags_dir, &path)?;
            let content = std::fs::read_to_string(&path).map_err(|e| RecipeError::io(&path, e))?;
            let raw: RawTagFile = serde_json::from_str(&content)
                .map_err(|e| RecipeError::malformed(format!("failed to parse {:?}: {}", path, e)))?;

            let entries = raw
                .values
                .iter()
                .map(|v| TagEntry::parse(v))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| RecipeError::malformed(format!("in {:?}: {}", path, e)))?;

            debug!("Loaded tag {} with {} entries", id, entries.len());
            let existing = self.tags.entry(id).or_default();
            if raw.replace {
                existing.clear();
            }
            existing.extend(entries);
        }

        self.validate()?;
        info!("Loaded {} item tags", self.tags.len());

        Ok(())
    }

    /// Start (or continue) building a tag in code
    pub fn tag(&mut self, id: ResourceLocation) -> TagAppender<'_> {
        TagAppender {
            entries: self.tags.entry(id).or_default(),
        }
    }

    /// Reject reference cycles; warn about references to undefined tags
    pub fn validate(&self) -> Result<(), RecipeError> {
        let mut done = HashSet::new();
        for id in self.tags.keys() {
            let mut stack = Vec::new();
            self.visit(id, &mut stack, &mut done)?;
        }
        Ok(())
    }

    fn visit<'a>(
        &'a self,
        id: &'a ResourceLocation,
        stack: &mut Vec<&'a ResourceLocation>,
        done: &mut HashSet<&'a ResourceLocation>,
    ) -> Result<(), RecipeError> {
        if done.contains(id) {
            return Ok(());
        }
        if stack.contains(&id) {
            let chain: Vec<String> = stack.iter().map(|t| t.to_string()).collect();
            return Err(RecipeError::malformed(format!(
                "tag reference cycle: {} -> {}",
                chain.join(" -> "),
                id
            )));
        }

        stack.push(id);
        for entry in self.tags.get(id).into_iter().flatten() {
            if let TagEntry::Tag(child) = entry {
                if self.tags.contains_key(child) {
                    self.visit(child, stack, done)?;
                } else {
                    warn!("Tag {} references undefined tag #{}", id, child);
                }
            }
        }
        stack.pop();
        done.insert(id);

        Ok(())
    }

    /// Every item in a tag, following nested tag references
    pub fn items(&self, tag: &ResourceLocation) -> BTreeSet<ResourceLocation> {
        let mut items = BTreeSet::new();
        let mut seen = HashSet::new();
        self.collect_items(tag, &mut items, &mut seen);
        items
    }

    fn collect_items<'a>(
        &'a self,
        tag: &'a ResourceLocation,
        items: &mut BTreeSet<ResourceLocation>,
        seen: &mut HashSet<&'a ResourceLocation>,
    ) {
        if !seen.insert(tag) {
            return;
        }
        for entry in self.tags.get(tag).into_iter().flatten() {
            match entry {
                TagEntry::Item(item) => {
                    items.insert(item.clone());
                }
                TagEntry::Tag(child) => self.collect_items(child, items, seen),
            }
        }
    }

    fn contains_item<'a>(
        &'a self,
        tag: &'a ResourceLocation,
        item: &ResourceLocation,
        seen: &mut HashSet<&'a ResourceLocation>,
    ) -> bool {
        if !seen.insert(tag) {
            return false;
        }
        self.tags.get(tag).into_iter().flatten().any(|entry| match entry {
            TagEntry::Item(member) => member == item,
            TagEntry::Tag(child) => self.contains_item(child, item, seen),
        })
    }

    pub fn contains(&self, tag: &ResourceLocation) -> bool {
        self.tags.contains_key(tag)
    }

    pub fn ids(&self) -> impl Iterator<Item = &ResourceLocation> {
        self.tags.keys()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Write every tag as a data file below `data_dir/tags/items`
    pub fn write_to_directory(&self, data_dir: &Path) -> Result<(), RecipeError> {
        let tags_dir = data_dir.join("tags").join("items");

        for (id, entries) in &self.tags {
            let path = datapack::path_for_id(&tags_dir, id);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| RecipeError::io(parent, e))?;
            }

            let raw = RawTagFile {
                replace: false,
                values: entries.iter().map(TagEntry::to_value).collect(),
            };
            let content = serde_json::to_string_pretty(&raw)
                .map_err(|e| RecipeError::malformed(format!("failed to encode tag {}: {}", id, e)))?;
            std::fs::write(&path, content).map_err(|e| RecipeError::io(&path, e))?;
        }

        info!("Wrote {} item tags to {:?}", self.tags.len(), tags_dir);

        Ok(())
    }
}

impl TagLookup for TagRegistry {
    fn is_in_tag(&self, tag: &ResourceLocation, item: &ResourceLocation) -> bool {
        let mut seen = HashSet::new();
        self.contains_item(tag, item, &mut seen)
    }
}

/// Appends entries to one tag; returned by [`TagRegistry::tag`]
pub struct TagAppender<'a> {
    entries: &'a mut Vec<TagEntry>,
}

impl TagAppender<'_> {
    pub fn add(self, items: impl IntoIterator<Item = ResourceLocation>) -> Self {
        self.entries.extend(items.into_iter().map(TagEntry::Item));
        self
    }

    pub fn add_tag(self, tag: ResourceLocation) -> Self {
        self.entries.push(TagEntry::Tag(tag));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn id(s: &str) -> ResourceLocation {
        s.parse().unwrap()
    }

    #[test]
    fn test_builder_and_nested_lookup() {
        let mut tags = TagRegistry::new();
        tags.tag(id("botania:runes/elemental"))
            .add([id("botania:rune_water"), id("botania:rune_fire")]);
        tags.tag(id("botania:runes"))
            .add_tag(id("botania:runes/elemental"))
            .add([id("botania:rune_mana")]);

        assert!(tags.is_in_tag(&id("botania:runes"), &id("botania:rune_fire")));
        assert!(tags.is_in_tag(&id("botania:runes"), &id("botania:rune_mana")));
        assert!(!tags.is_in_tag(&id("botania:runes/elemental"), &id("botania:rune_mana")));
        assert!(!tags.is_in_tag(&id("botania:missing"), &id("botania:rune_mana")));
        assert_eq!(tags.items(&id("botania:runes")).len(), 3);
    }

    #[test]
    fn test_cycle_rejected() {
        let mut tags = TagRegistry::new();
        tags.tag(id("a:one")).add_tag(id("a:two"));
        tags.tag(id("a:two")).add_tag(id("a:one"));

        assert!(matches!(tags.validate(), Err(RecipeError::MalformedData(_))));
        // Lookups still terminate
        assert!(!tags.is_in_tag(&id("a:one"), &id("a:item")));
    }

    #[test]
    fn test_undefined_reference_is_not_fatal() {
        let mut tags = TagRegistry::new();
        tags.tag(id("a:one")).add_tag(id("a:nowhere"));
        assert!(tags.validate().is_ok());
    }

    #[test]
    fn test_write_then_load() {
        let temp_dir = TempDir::new().unwrap();

        let mut tags = TagRegistry::new();
        tags.tag(id("botania:petals")).add([id("botania:white_petal")]);
        tags.tag(id("botania:petals/all"))
            .add_tag(id("botania:petals"))
            .add([id("botania:black_petal")]);
        tags.write_to_directory(temp_dir.path()).unwrap();

        assert!(temp_dir
            .path()
            .join("tags/items/botania/petals/all.json")
            .exists());

        let mut loaded = TagRegistry::new();
        loaded.load_from_directory(temp_dir.path()).unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(loaded.is_in_tag(&id("botania:petals/all"), &id("botania:white_petal")));
    }

    #[test]
    fn test_replace_flag() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("tags/items/botania");
        std::fs::create_dir_all(&dir).unwrap();

        let mut tags = TagRegistry::new();
        tags.tag(id("botania:gems")).add([id("minecraft:diamond")]);

        std::fs::write(
            dir.join("gems.json"),
            r#"{"replace": true, "values": ["minecraft:emerald"]}"#,
        )
        .unwrap();
        tags.load_from_directory(temp_dir.path()).unwrap();

        assert!(tags.is_in_tag(&id("botania:gems"), &id("minecraft:emerald")));
        assert!(!tags.is_in_tag(&id("botania:gems"), &id("minecraft:diamond")));
    }

    #[test]
    fn test_missing_directory_loads_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let mut tags = TagRegistry::new();
        tags.load_from_directory(temp_dir.path()).unwrap();
        assert!(tags.is_empty());
    }
}
