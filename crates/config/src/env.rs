//! Environment key derivation and environment snapshots.
//!
//! Responsibilities:
//! - Define `EnvKey`, the prefix that namespaces all environment lookups.
//! - Capture an explicit `EnvSnapshot` of the process environment.
//! - Extract `<KEY>_<FIELD>` variables into a lowercase-keyed map.
//!
//! Does NOT handle:
//! - Reading the configuration file (see file.rs).
//! - Merging sources (see merge.rs).
//! - Debug/location resolution (see resolver.rs).
//!
//! Invariants:
//! - `EnvKey` is non-empty and fixed for the lifetime of a resolver.
//! - Derived variable names are deterministic functions of the key.
//! - Extracted map keys are always lowercase; prefix matching is
//!   case-sensitive.
//! - When two variables lowercase to the same field, variables are visited
//!   in byte order of their original names and later ones overwrite
//!   earlier ones.

use std::collections::BTreeMap;

use crate::RawConfigMap;
use crate::error::ConfigError;

/// The prefix that namespaces all environment-variable interactions for
/// one resolver instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvKey(String);

impl EnvKey {
    /// Creates a key, rejecting empty or whitespace-only prefixes.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ConfigError::EmptyEnvKey);
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the variable whose presence enables debug tracing.
    pub fn debug_var(&self) -> String {
        format!("DEBUG_{}", self.0)
    }

    /// Name of the variable that overrides the file location.
    pub fn file_var(&self) -> String {
        format!("FILE_{}", self.0)
    }

    /// Prefix (including the separating underscore) for field variables.
    pub(crate) fn field_prefix(&self) -> String {
        format!("{}_", self.0)
    }
}

impl std::fmt::Display for EnvKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An explicit snapshot of environment variables.
///
/// Taking the environment as an injectable input keeps resolution
/// deterministic in tests without mutating the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Captures the current process environment.
    ///
    /// Variables with non-Unicode names or values are skipped.
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars_os()
                .filter_map(|(name, value)| {
                    Some((name.into_string().ok()?, value.into_string().ok()?))
                })
                .collect(),
        }
    }

    /// Looks up a variable by exact name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Looks up a variable, treating empty or whitespace-only values as unset.
    pub fn get_non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|value| !value.trim().is_empty())
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.vars.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Extracts `<KEY>_<FIELD>` variables from the snapshot into a map keyed
/// by the lowercased field name, keeping the raw value.
pub(crate) fn read_env_map(key: &EnvKey, snapshot: &EnvSnapshot) -> RawConfigMap {
    let prefix = key.field_prefix();
    let mut map = RawConfigMap::new();
    for (name, value) in snapshot.iter() {
        let Some(field) = name.strip_prefix(prefix.as_str()) else {
            continue;
        };
        if field.is_empty() {
            continue;
        }
        let field = field.to_lowercase();
        if map.insert(field.clone(), value.clone()).is_some() {
            tracing::warn!(
                prefix = %key,
                field = %field,
                "Multiple environment variables lowercase to the same field, keeping the later one"
            );
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(vars: &[(&str, &str)]) -> EnvSnapshot {
        vars.iter().copied().collect()
    }

    #[test]
    fn test_empty_env_key_rejected() {
        assert!(matches!(EnvKey::new(""), Err(ConfigError::EmptyEnvKey)));
        assert!(matches!(EnvKey::new("   "), Err(ConfigError::EmptyEnvKey)));
    }

    #[test]
    fn test_derived_variable_names() {
        let key = EnvKey::new("MYAPP").unwrap();
        assert_eq!(key.debug_var(), "DEBUG_MYAPP");
        assert_eq!(key.file_var(), "FILE_MYAPP");
        assert_eq!(key.field_prefix(), "MYAPP_");
    }

    #[test]
    fn test_field_names_are_lowercased() {
        let key = EnvKey::new("APP").unwrap();
        let snap = snapshot(&[("APP_FOO", "bar"), ("APP_Mixed", "1")]);

        let map = read_env_map(&key, &snap);
        assert_eq!(map.get("foo").map(String::as_str), Some("bar"));
        assert_eq!(map.get("mixed").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_prefix_match_is_case_sensitive() {
        let key = EnvKey::new("APP").unwrap();
        let snap = snapshot(&[("app_name", "lower"), ("APP_NAME", "upper")]);

        let map = read_env_map(&key, &snap);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("name").map(String::as_str), Some("upper"));
    }

    #[test]
    fn test_bare_prefix_and_unrelated_variables_ignored() {
        let key = EnvKey::new("APP").unwrap();
        let snap = snapshot(&[("APP_", "empty-field"), ("APPX_NAME", "no"), ("OTHER", "no")]);

        let map = read_env_map(&key, &snap);
        assert!(map.is_empty());
    }

    #[test]
    fn test_empty_value_is_kept_verbatim() {
        let key = EnvKey::new("APP").unwrap();
        let snap = snapshot(&[("APP_NAME", "")]);

        let map = read_env_map(&key, &snap);
        assert_eq!(map.get("name").map(String::as_str), Some(""));
    }

    #[test]
    fn test_lowercase_collision_is_deterministic() {
        let key = EnvKey::new("X").unwrap();
        // "X_NAME" sorts before "X_Name" in byte order, so the latter wins.
        let snap = snapshot(&[("X_NAME", "first"), ("X_Name", "second")]);

        let map = read_env_map(&key, &snap);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("name").map(String::as_str), Some("second"));
    }

    #[cfg(unix)]
    #[test]
    #[serial_test::serial]
    fn test_from_process_skips_non_unicode_variables() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let bad_name = OsString::from_vec(b"CONFMIX_BAD_\xff".to_vec());
        let bad_value = OsString::from_vec(b"\xfe\xff".to_vec());
        unsafe {
            std::env::set_var(&bad_name, &bad_value);
            std::env::set_var("CONFMIX_GOOD", "ok");
        }

        let snap = EnvSnapshot::from_process();
        assert_eq!(snap.get("CONFMIX_GOOD"), Some("ok"));
        assert!(snap.iter().all(|(name, _)| !name.starts_with("CONFMIX_BAD_")));

        unsafe {
            std::env::remove_var(&bad_name);
            std::env::remove_var("CONFMIX_GOOD");
        }
    }

    #[test]
    fn test_get_non_empty_filters_whitespace() {
        let snap = snapshot(&[("A", "  "), ("B", ""), ("C", "value")]);
        assert_eq!(snap.get_non_empty("A"), None);
        assert_eq!(snap.get_non_empty("B"), None);
        assert_eq!(snap.get_non_empty("C"), Some("value"));
        assert_eq!(snap.get("A"), Some("  "));
    }
}
