//! Resolver construction, attribute resolution, and the load/store operations.
//!
//! Responsibilities:
//! - Provide a builder-pattern `ConfigBuilder` for resolver construction.
//! - Resolve the effective debug flag and file location once, at build time.
//! - Orchestrate `load()`: read file, read environment, trace, merge, and
//!   hand the merged map to the injected factory.
//! - Orchestrate `store()`: serialize and overwrite the resolved location.
//!
//! Does NOT handle:
//! - File parsing (see file.rs) or environment extraction (see env.rs).
//! - The factory's own field requirements; its errors propagate unaltered.
//!
//! Invariants / Assumptions:
//! - `DEBUG_<KEY>` presence overrides the explicit debug setting.
//! - `FILE_<KEY>` (non-empty) overrides the explicit location.
//! - Debug and location are fixed after `build()` and never re-resolved.
//! - Each `load()` re-reads the file; the environment is rescanned unless
//!   a snapshot was injected.
//! - `load_dotenv()` must be called explicitly to enable `.env` loading,
//!   and the `DOTENV_DISABLED` variable is checked before `dotenvy::dotenv()`.

use std::borrow::Cow;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;

use crate::RawConfigMap;
use crate::env::{EnvKey, EnvSnapshot, read_env_map};
use crate::error::ConfigError;
use crate::file::{FileOutcome, read_file_map};
use crate::merge::merge;
use crate::persistence::write_config_file;
use crate::trace::{DebugTracer, TraceSource};

/// Factory capability: constructs a typed configuration object from the
/// merged mapping.
///
/// This is the seam for the externally supplied configuration type.
/// Implementations enforce their own required fields; `Config::load`
/// propagates their errors unaltered.
pub trait FromConfig: Sized {
    type Error;

    fn from_config(map: RawConfigMap) -> Result<Self, Self::Error>;
}

/// Builder for a [`Config`] resolver.
pub struct ConfigBuilder {
    env_key: EnvKey,
    location: Option<PathBuf>,
    debug: Option<bool>,
    snapshot: Option<EnvSnapshot>,
}

impl ConfigBuilder {
    /// Creates a builder for the given environment key prefix.
    pub fn new(env_key: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            env_key: EnvKey::new(env_key)?,
            location: None,
            debug: None,
            snapshot: None,
        })
    }

    /// Sets the explicit configuration file location.
    ///
    /// A non-empty `FILE_<KEY>` environment variable still takes precedence.
    pub fn with_location(mut self, location: impl Into<PathBuf>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the explicit debug flag.
    ///
    /// A present `DEBUG_<KEY>` environment variable still takes precedence.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Pins an environment snapshot instead of reading the process
    /// environment (primarily for testing).
    pub fn with_env_snapshot(mut self, snapshot: EnvSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    /// Check if dotenv loading is disabled via environment variable.
    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var("DOTENV_DISABLED").ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load environment variables from .env file if present.
    ///
    /// If `DOTENV_DISABLED` environment variable is set to "true" or "1",
    /// the .env file will not be loaded (useful for testing).
    ///
    /// Missing `.env` files are silently ignored.
    ///
    /// SAFETY: Error messages never include raw .env line contents to
    /// prevent secret leakage.
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if Self::is_not_found(&e) => Ok(self),
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(ConfigError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(ConfigError::DotenvUnknown),
        }
    }

    /// Check if a dotenv error indicates the file was not found.
    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Resolves the debug flag and file location and builds the resolver.
    ///
    /// Resolution happens exactly once here; the resolved values are
    /// stored as immutable fields and never re-resolved, even if the
    /// environment changes afterward.
    pub fn build<T: FromConfig>(self) -> Config<T> {
        let (debug, location) = {
            let resolution = match &self.snapshot {
                Some(snapshot) => Cow::Borrowed(snapshot),
                None => Cow::Owned(EnvSnapshot::from_process()),
            };

            // DEBUG_<KEY> presence enables tracing regardless of its value.
            let debug = if resolution.get(&self.env_key.debug_var()).is_some() {
                true
            } else {
                self.debug.unwrap_or(false)
            };

            let location = resolution
                .get_non_empty(&self.env_key.file_var())
                .map(PathBuf::from)
                .or_else(|| self.location.clone());

            (debug, location)
        };

        let tracer = DebugTracer::new(debug);
        if location.is_none() {
            tracer.warn_no_location();
        }

        Config {
            env_key: self.env_key,
            location,
            snapshot: self.snapshot,
            tracer,
            _factory: PhantomData,
        }
    }
}

/// A configuration resolver with resolved, immutable attributes.
///
/// `T` is the externally supplied configuration type constructed from the
/// merged mapping.
pub struct Config<T: FromConfig> {
    env_key: EnvKey,
    location: Option<PathBuf>,
    snapshot: Option<EnvSnapshot>,
    tracer: DebugTracer,
    _factory: PhantomData<fn() -> T>,
}

impl<T: FromConfig> Config<T> {
    /// The prefix namespacing all environment interactions.
    pub fn env_key(&self) -> &EnvKey {
        &self.env_key
    }

    /// The debug flag resolved at build time.
    pub fn debug(&self) -> bool {
        self.tracer.enabled()
    }

    /// The file location resolved at build time, if any.
    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    /// The environment used by `load()`: the pinned snapshot if one was
    /// injected, otherwise a fresh scan of the process environment.
    fn snapshot(&self) -> Cow<'_, EnvSnapshot> {
        match &self.snapshot {
            Some(snapshot) => Cow::Borrowed(snapshot),
            None => Cow::Owned(EnvSnapshot::from_process()),
        }
    }

    /// Constructs a `T` from the merged file and environment configuration.
    ///
    /// File read or parse failures never surface here; they degrade to an
    /// empty file contribution (visible in the debug trace). The only
    /// error is the factory rejecting the merged mapping, which is how
    /// required configuration is enforced.
    pub fn load(&self) -> Result<T, T::Error> {
        let file_map = {
            let outcome = read_file_map(self.location.as_deref());
            match &outcome {
                FileOutcome::Read(map) => self.tracer.trace_map(TraceSource::File, map),
                FileOutcome::Empty => {
                    self.tracer.trace_map(TraceSource::File, &RawConfigMap::new());
                }
                FileOutcome::Failed(description) => {
                    self.tracer.trace_failure(TraceSource::File, description);
                }
            }
            outcome.into_map()
        };

        let env_map = read_env_map(&self.env_key, &self.snapshot());
        self.tracer.trace_map(TraceSource::Env, &env_map);

        T::from_config(merge(&file_map, &env_map))
    }

    /// Serializes `value` and fully overwrites the file at the resolved
    /// location. No merging with existing content occurs.
    ///
    /// # Errors
    /// Returns an error if no location was resolved, or if serialization
    /// or the write fails.
    pub fn store<S: Serialize>(&self, value: &S) -> anyhow::Result<()> {
        let path = self
            .location
            .as_deref()
            .context("No configuration file path was resolved")?;
        write_config_file(path, value)
    }
}
