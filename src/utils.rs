use crate::result::Result;
use std::fs;
use std::path::{Component, Path};

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Delete a previously produced file so the next write starts from scratch
pub fn remove_file_if_exists(path: &Path) -> Result<bool> {
    if path.is_file() {
        fs::remove_file(path)?;
        return Ok(true);
    }
    Ok(false)
}

/// Build a zip entry name from a relative path, always using `/` separators
pub fn archive_entry_name(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
