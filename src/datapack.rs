//! Data pack layout helpers.
//!
//! Recipe and tag files live under `<root>/<namespace>/<path>.json`; the file's
//! identifier is `namespace:path` with the extension stripped.

use std::path::{Path, PathBuf};

use crate::error::RecipeError;
use crate::resource::ResourceLocation;

/// Recursively collect every `.json` file below `dir`, sorted by path
pub fn collect_json_files(dir: &Path) -> Result<Vec<PathBuf>, RecipeError> {
    let mut paths = Vec::new();
    collect_recursive(dir, &mut paths)?;
    paths.sort();
    Ok(paths)
}

fn collect_recursive(dir: &Path, paths: &mut Vec<PathBuf>) -> Result<(), RecipeError> {
    let entries = std::fs::read_dir(dir).map_err(|e| RecipeError::io(dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| RecipeError::io(dir, e))?;
        let path = entry.path();

        if path.is_dir() {
            collect_recursive(&path, paths)?;
        } else if path.extension().map_or(false, |ext| ext == "json") {
            paths.push(path);
        }
    }

    Ok(())
}

/// Derive `namespace:path` from a file below `root`
pub fn id_from_path(root: &Path, file: &Path) -> Result<ResourceLocation, RecipeError> {
    let relative = file
        .strip_prefix(root)
        .map_err(|_| RecipeError::malformed(format!("{:?} is not inside {:?}", file, root)))?
        .with_extension("");

    let mut parts = relative.iter().map(|p| p.to_string_lossy());
    let namespace = parts
        .next()
        .ok_or_else(|| RecipeError::malformed(format!("{:?} has no namespace directory", file)))?;
    let path: Vec<_> = parts.collect();
    if path.is_empty() {
        return Err(RecipeError::malformed(format!(
            "{:?} must be inside a namespace directory",
            file
        )));
    }

    ResourceLocation::new(&namespace, &path.join("/"))
}

/// Inverse of [`id_from_path`]
pub fn path_for_id(root: &Path, id: &ResourceLocation) -> PathBuf {
    let mut path = root.join(id.namespace());
    for segment in id.path().split('/') {
        path.push(segment);
    }
    path.set_extension("json");
    path
}
