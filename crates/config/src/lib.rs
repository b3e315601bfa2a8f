//! Prefix-scoped configuration resolution.
//!
//! This crate resolves application configuration from two sources: an
//! optional JSON file and environment variables sharing a common name
//! prefix. The two are merged into a single flat mapping (environment
//! wins), which is handed to a caller-supplied factory to produce a
//! typed configuration object.

mod env;
mod error;
mod file;
mod merge;
mod persistence;
mod resolver;
mod trace;

pub use env::{EnvKey, EnvSnapshot};
pub use error::ConfigError;
pub use resolver::{Config, ConfigBuilder, FromConfig};

/// Flat string-keyed mapping exchanged between readers, merger, and factory.
///
/// Environment-sourced keys are always lowercase; file-sourced keys pass
/// through as written in the file.
pub type RawConfigMap = std::collections::BTreeMap<String, String>;
