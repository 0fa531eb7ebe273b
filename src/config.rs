//! Configuration for the `runic-altar` binary, read from a TOML file.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::error::RecipeError;

pub const DEFAULT_CONFIG_PATH: &str = "runic-altar.toml";

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_output() -> PathBuf {
    PathBuf::from("recipes.bin")
}

fn default_log_filter() -> String {
    "runic_altar=info".to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AltarConfig {
    /// Root of the data pack (`recipes/` and `tags/items/` live below it)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Where the recipe sync payload is written
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Default `tracing` directive; `RUST_LOG` adds to it
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for AltarConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            output: default_output(),
            log_filter: default_log_filter(),
        }
    }
}

impl AltarConfig {
    pub fn from_toml(content: &str) -> Result<Self, RecipeError> {
        toml::from_str(content).map_err(|e| RecipeError::Config(e.to_string()))
    }

    /// Load from `path`; a missing file means all defaults
    pub fn load(path: &Path) -> Result<Self, RecipeError> {
        if !path.exists() {
            warn!("Config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| RecipeError::io(path, e))?;
        Self::from_toml(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_config() {
        let config = AltarConfig::from_toml(
            r#"
            data_dir = "packs/botania"
            output = "out/altar.bin"
            "#,
        )
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("packs/botania"));
        assert_eq!(config.output, PathBuf::from("out/altar.bin"));
        assert_eq!(config.log_filter, "runic_altar=info");
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(AltarConfig::from_toml("").unwrap(), AltarConfig::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(matches!(
            AltarConfig::from_toml("data_directory = \"x\""),
            Err(RecipeError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = AltarConfig::load(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, AltarConfig::default());
    }
}
