//! Namespaced identifiers (`namespace:path`) used for items, tags and recipes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RecipeError;

pub const DEFAULT_NAMESPACE: &str = "minecraft";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceLocation {
    namespace: String,
    path: String,
}

impl ResourceLocation {
    pub fn new(namespace: &str, path: &str) -> Result<Self, RecipeError> {
        if namespace.is_empty() || !namespace.chars().all(valid_namespace_char) {
            return Err(RecipeError::malformed(format!(
                "invalid namespace in identifier '{}:{}'",
                namespace, path
            )));
        }
        if path.is_empty() || !path.chars().all(valid_path_char) {
            return Err(RecipeError::malformed(format!(
                "invalid path in identifier '{}:{}'",
                namespace, path
            )));
        }
        Ok(Self {
            namespace: namespace.to_string(),
            path: path.to_string(),
        })
    }

    /// Build from an identifier literal that is known to be valid
    pub(crate) fn from_static(id: &'static str) -> Self {
        debug_assert!(id.parse::<ResourceLocation>().is_ok(), "invalid identifier {}", id);
        let (namespace, path) = id.split_once(':').unwrap_or((DEFAULT_NAMESPACE, id));
        Self {
            namespace: namespace.to_string(),
            path: path.to_string(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

fn valid_namespace_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.')
}

fn valid_path_char(c: char) -> bool {
    valid_namespace_char(c) || c == '/'
}

impl FromStr for ResourceLocation {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((namespace, path)) => Self::new(namespace, path),
            None => Self::new(DEFAULT_NAMESPACE, s),
        }
    }
}

impl TryFrom<String> for ResourceLocation {
    type Error = RecipeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ResourceLocation> for String {
    fn from(value: ResourceLocation) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ResourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_namespaced() {
        let id: ResourceLocation = "botania:rune_water".parse().unwrap();
        assert_eq!(id.namespace(), "botania");
        assert_eq!(id.path(), "rune_water");
        assert_eq!(id.to_string(), "botania:rune_water");
    }

    #[test]
    fn test_bare_path_gets_default_namespace() {
        let id: ResourceLocation = "stone".parse().unwrap();
        assert_eq!(id.to_string(), "minecraft:stone");
    }

    #[test]
    fn test_nested_path_allowed() {
        let id: ResourceLocation = "botania:runic_altar/water".parse().unwrap();
        assert_eq!(id.path(), "runic_altar/water");
    }

    #[test]
    fn test_rejects_bad_characters() {
        assert!(matches!(
            "Botania:rune".parse::<ResourceLocation>(),
            Err(RecipeError::MalformedData(_))
        ));
        assert!("botania:rune water".parse::<ResourceLocation>().is_err());
        assert!("botania:".parse::<ResourceLocation>().is_err());
        assert!("botania/x:rune".parse::<ResourceLocation>().is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let id: ResourceLocation = serde_json::from_str("\"botania:mana_pearl\"").unwrap();
        assert_eq!(id.path(), "mana_pearl");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"botania:mana_pearl\"");
    }
}
