//! Debug tracing of source contributions.
//!
//! Responsibilities:
//! - Render what each reader produced as trace lines.
//! - Emit those lines through `tracing`, gated by the resolved debug flag.
//!
//! Does NOT handle:
//! - Resolving the debug flag itself (see resolver.rs).
//!
//! Invariants:
//! - Nothing is emitted when the debug flag is false.
//! - Tracing is a side-channel and never affects the returned maps.

use std::fmt;

use crate::RawConfigMap;

/// Which reader a trace refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TraceSource {
    File,
    Env,
}

impl fmt::Display for TraceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceSource::File => f.write_str("FILE"),
            TraceSource::Env => f.write_str("ENV"),
        }
    }
}

/// Emits diagnostic output describing reader contributions.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DebugTracer {
    enabled: bool,
}

impl DebugTracer {
    pub(crate) fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub(crate) fn enabled(&self) -> bool {
        self.enabled
    }

    /// Traces the key/value pairs a reader produced, or `EMPTY`.
    pub(crate) fn trace_map(&self, source: TraceSource, map: &RawConfigMap) {
        if !self.enabled {
            return;
        }
        for line in render_map(source, map) {
            tracing::debug!(source = %source, "{}", line);
        }
    }

    /// Traces a captured read/parse failure description.
    pub(crate) fn trace_failure(&self, source: TraceSource, description: &str) {
        if !self.enabled {
            return;
        }
        tracing::debug!(source = %source, "{}", render_failure(source, description));
    }

    /// Warns that no configuration file path was resolved.
    pub(crate) fn warn_no_location(&self) {
        if !self.enabled {
            return;
        }
        tracing::warn!("No configuration file path was specified");
    }
}

/// Renders the trace lines for a reader's contribution: a header naming
/// the source, then one line per pair or a single `EMPTY` line.
pub(crate) fn render_map(source: TraceSource, map: &RawConfigMap) -> Vec<String> {
    let mut lines = vec![format!("{} configuration:", source)];
    if map.is_empty() {
        lines.push("EMPTY".to_string());
    } else {
        for (key, value) in map {
            lines.push(format!("{} = {}", key, value));
        }
    }
    lines
}

fn render_failure(source: TraceSource, description: &str) -> String {
    format!("{} configuration failed: {}", source, description)
}
