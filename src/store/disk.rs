//! Whole-file JSON persistence used by the history and settings stores.
//!
//! Every save rewrites the file in place; there is no atomic rename, so a
//! crash mid-write can leave a truncated file behind. Loading such a file
//! fails and the caller falls back to its empty state.

use anyhow::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Reads and decodes `path`. Returns `Ok(None)` if the file does not exist.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        debug!("No file at {}", path.display());
        return Ok(None);
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let value = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse file: {}", path.display()))?;
    debug!("Loaded {}", path.display());
    Ok(Some(value))
}

pub fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let contents = serde_json::to_string_pretty(value)?;
    fs::write(path, contents)
        .with_context(|| format!("Failed to write file: {}", path.display()))?;
    debug!("Saved {}", path.display());
    Ok(())
}
