//! Raw environment input.
//!
//! [`RawEnv`] is the unvalidated key/value map the engine consumes. It is
//! filled from the process environment or explicit pairs, optionally merged
//! with a `.env` file, and remembers where each entry came from.
//!
//! ```rust,ignore
//! use cleanenv::RawEnv;
//!
//! let mut raw = RawEnv::from_process();
//! raw.merge_dotenv(".env")?;
//! ```

use std::collections::BTreeMap;
#[cfg(feature = "dotenv")]
use std::path::Path;

use tracing::warn;
#[cfg(feature = "dotenv")]
use tracing::debug;

#[cfg(feature = "dotenv")]
use crate::Error;
use crate::Source;

/// One raw entry and its origin.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawVar {
    /// The raw string value.
    pub value: String,

    /// Where the value was read from.
    pub source: Source,
}

/// Unvalidated environment map.
///
/// The engine never mutates a `RawEnv`; it only reads from it.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RawEnv {
    vars: BTreeMap<String, RawVar>,
}

impl RawEnv {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vars: BTreeMap::new(),
        }
    }

    /// Snapshots the process environment.
    ///
    /// Entries whose name or value is not valid UTF-8 are skipped.
    #[must_use]
    pub fn from_process() -> Self {
        let mut raw = Self::new();

        for (key, value) in std::env::vars_os() {
            match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => raw.insert(key, value, Source::Environment),

                (Ok(key), Err(_)) => {
                    warn!(key = %key, "skipping environment variable with non-UTF-8 value");
                }

                (Err(key), _) => {
                    warn!(key = ?key, "skipping environment variable with non-UTF-8 name");
                }
            }
        }

        raw
    }

    /// Builds a map from explicit pairs, attributed to the environment.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        pairs.into_iter().collect()
    }

    /// Sets an entry, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value, Source::Environment);
        self
    }

    /// Sets an entry with an explicit source, replacing any previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>, source: Source) {
        self.vars.insert(
            key.into(),
            RawVar {
                value: value.into(),
                source,
            },
        );
    }

    /// Merges a `.env` file underneath the current entries.
    ///
    /// Entries already present win over file entries. A missing file is not
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Dotenv`] if the file exists but cannot be read or
    /// parsed.
    #[cfg(feature = "dotenv")]
    pub fn merge_dotenv(&mut self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let to_error = |source: dotenvy::Error| Error::Dotenv {
            path: path.to_path_buf(),
            source,
        };

        let iter = match dotenvy::from_path_iter(path) {
            Ok(iter) => iter,

            Err(e) if e.not_found() => {
                debug!(path = %path.display(), "no dotenv file, skipping");
                return Ok(());
            }

            Err(e) => return Err(to_error(e)),
        };

        let mut merged = 0_usize;
        for item in iter {
            let (key, value) = item.map_err(to_error)?;
            if !self.vars.contains_key(&key) {
                self.insert(key, value, Source::DotenvFile(Some(path.to_path_buf())));
                merged += 1;
            }
        }

        debug!(path = %path.display(), merged, "merged dotenv file");
        Ok(())
    }

    /// Returns the raw value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(|v| v.value.as_str())
    }

    /// Returns the entry (value and source) for `key`.
    #[must_use]
    pub fn get_var(&self, key: &str) -> Option<&RawVar> {
        self.vars.get(key)
    }

    /// Returns `true` if `key` has an entry.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.value.as_str()))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut raw = Self::new();
        for (key, value) in iter {
            raw.insert(key, value, Source::Environment);
        }
        raw
    }
}
