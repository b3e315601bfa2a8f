//! Writing configuration objects back to disk.
//!
//! Responsibilities:
//! - Serialize a caller-provided object to JSON text.
//! - Fully overwrite the file at the resolved location.
//!
//! Does NOT handle:
//! - Merging with existing file content (store is a full overwrite).
//! - Location resolution (see resolver.rs).
//!
//! Invariants:
//! - Writes are atomic (temp file + rename).
//! - I/O and serialization failures propagate to the caller.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// Serializes `value` as pretty JSON and atomically replaces the file at
/// `path`, creating parent directories as needed.
pub(crate) fn write_config_file<S: Serialize>(path: &Path, value: &S) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
    }

    let content = serde_json::to_string_pretty(value).context("Failed to serialize config")?;

    // Write to a temporary file first so the target is never left half-written.
    let temp_path = path.with_extension("tmp");
    std::fs::write(&temp_path, content).context("Failed to write temporary config file")?;
    std::fs::rename(&temp_path, path).context("Failed to rename temporary config file")?;

    tracing::debug!(path = %path.display(), "Config written");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use tempfile::TempDir;

    #[test]
    fn test_write_produces_valid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        write_config_file(&path, &json!({"x": 1})).unwrap();

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, json!({"x": 1}));
    }

    #[test]
    fn test_write_fully_replaces_prior_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"old": "contents", "kept": false}"#).unwrap();

        write_config_file(&path, &json!({"x": 1})).unwrap();

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, json!({"x": 1}));
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");

        write_config_file(&path, &json!({"x": 1})).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        write_config_file(&path, &json!({"x": 1})).unwrap();
        assert!(!dir.path().join("config.tmp").exists());
    }
}
