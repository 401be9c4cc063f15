//! Loading engine inputs from JSON files.
//!
//! This is the only fallible part of the crate. Once a compendium and a
//! character are loaded, stat derivation cannot fail.

use crate::character::Character;
use crate::compendium::Compendium;
use crate::modifiers::Modifier;
use std::path::Path;
use thiserror::Error;
use tokio::fs;

/// Errors from loading input files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Load a compendium from a JSON array of tagged records.
pub async fn load_compendium_json(path: impl AsRef<Path>) -> Result<Compendium, LoadError> {
    let content = fs::read_to_string(path).await?;
    Ok(Compendium::from_json_str(&content)?)
}

/// Load every `.json` compendium file in a directory into one compendium.
///
/// Files are merged in file name order, so a later file overrides records
/// of an earlier one.
pub async fn load_compendium_dir(dir: impl AsRef<Path>) -> Result<Compendium, LoadError> {
    let mut paths = Vec::new();
    let mut entries = fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|e| e == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut compendium = Compendium::new();
    for path in paths {
        let part = load_compendium_json(&path).await?;
        tracing::debug!(path = %path.display(), items = part.len(), "loaded compendium file");
        compendium.extend(part.iter().cloned());
    }
    Ok(compendium)
}

/// Load a character snapshot.
pub async fn load_character_json(path: impl AsRef<Path>) -> Result<Character, LoadError> {
    let content = fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}

/// Load a modifier list.
pub async fn load_modifiers_json(path: impl AsRef<Path>) -> Result<Vec<Modifier>, LoadError> {
    let content = fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}
