//! Error types for configuration resolution.
//!
//! Responsibilities:
//! - Define error variants for resolver construction failures.
//!
//! Does NOT handle:
//! - File read/parse failures (absorbed into an empty contribution, see file.rs).
//! - Factory errors (propagated unaltered by `Config::load`).
//! - Store failures (see persistence.rs).
//!
//! Invariants:
//! - Dotenv errors NEVER include raw .env line contents to prevent secret leakage.

use std::io::ErrorKind;
use thiserror::Error;

/// Errors that can occur while constructing a configuration resolver.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment key prefix must not be empty")]
    EmptyEnvKey,

    /// Failed to parse the `.env` file due to invalid syntax.
    ///
    /// SAFETY: This error only includes the byte index of the parse failure,
    /// NOT the offending line content, to prevent leaking secrets.
    #[error(
        "Failed to parse .env file at position {error_index}. Hint: set DOTENV_DISABLED=1 to skip .env loading"
    )]
    DotenvParse { error_index: usize },

    /// Failed to read the `.env` file due to an I/O error.
    #[error("Failed to read .env file: {kind}")]
    DotenvIo { kind: ErrorKind },

    /// Unknown dotenv error (future variants from dotenvy crate).
    #[error("Failed to load .env file. Hint: set DOTENV_DISABLED=1 to skip .env loading")]
    DotenvUnknown,
}
