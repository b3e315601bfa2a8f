//! Configuration file reading.
//!
//! Responsibilities:
//! - Read the JSON object at the resolved location into a flat map.
//! - Capture read/parse failures as data instead of raising them.
//!
//! Does NOT handle:
//! - Location resolution (see resolver.rs).
//! - Writing configuration files (see persistence.rs).
//!
//! Invariants:
//! - A failed read or parse never surfaces as an error to the caller of
//!   `load()`; it degrades to an empty contribution.
//! - File keys pass through as written; only the environment reader
//!   lowercases keys.

use std::path::Path;

use serde_json::Value;

use crate::RawConfigMap;

/// Outcome of a file read attempt.
///
/// The tracer branches on this to report what the file contributed.
#[derive(Debug)]
pub(crate) enum FileOutcome {
    /// The file parsed as a JSON object; values are rendered as text.
    Read(RawConfigMap),
    /// No location was resolved, so no read was attempted.
    Empty,
    /// A read or parse attempt failed; the description is trace-only.
    Failed(String),
}

impl FileOutcome {
    /// The map this outcome contributes to the merge. Failures and the
    /// no-location case contribute nothing.
    pub(crate) fn into_map(self) -> RawConfigMap {
        match self {
            FileOutcome::Read(map) => map,
            FileOutcome::Empty | FileOutcome::Failed(_) => RawConfigMap::new(),
        }
    }
}

/// Reads the configuration file at `location`, if any.
pub(crate) fn read_file_map(location: Option<&Path>) -> FileOutcome {
    let Some(path) = location else {
        return FileOutcome::Empty;
    };

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            return FileOutcome::Failed(format!("failed to read {}: {}", path.display(), e));
        }
    };

    let value: Value = match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            return FileOutcome::Failed(format!("failed to parse {}: {}", path.display(), e));
        }
    };

    let Value::Object(object) = value else {
        return FileOutcome::Failed(format!("{} is not a JSON object", path.display()));
    };

    let map = object
        .into_iter()
        .map(|(key, value)| (key, value_text(value)))
        .collect();
    FileOutcome::Read(map)
}

/// Renders a JSON value as the string carried in the map: strings pass
/// through verbatim, everything else keeps its JSON text.
fn value_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
