//! Merging of file and environment contributions.
//!
//! Responsibilities:
//! - Overlay the file map with the environment map.
//!
//! Invariants:
//! - Environment values win on shared keys.
//! - Keys present in only one source pass through unchanged.
//! - Neither input map is mutated.

use crate::RawConfigMap;

/// Produces the file map overlaid by the environment map.
pub(crate) fn merge(file: &RawConfigMap, env: &RawConfigMap) -> RawConfigMap {
    let mut merged = file.clone();
    for (key, value) in env {
        merged.insert(key.clone(), value.clone());
    }
    merged
}
