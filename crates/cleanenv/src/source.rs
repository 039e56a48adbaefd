//! Source attribution for validated values.
//!
//! Every declared key records where its raw value came from, which helps when
//! debugging why a default (or a `.env` entry) won over what you expected.

use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

/// Indicates where a raw value originated from.
///
/// # Priority Order
///
/// Raw values are resolved in this order (highest first):
///
/// 1. **Environment variables** - `PORT=8080`
/// 2. **Dotenv files** - `.env` file entries
/// 3. **Dev defaults** - only outside production
/// 4. **Defaults** - the spec's plain default
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Source {
    /// Value was read from the process environment (or the caller's map).
    Environment,

    /// Value was loaded from a `.env` file.
    DotenvFile(Option<PathBuf>),

    /// Value came from the spec's plain default.
    Default,

    /// Value came from the spec's dev-only default.
    DevDefault,

    /// Value came from a test-only default while in test mode.
    TestDefault,

    /// No value was provided and the key is intentionally absent.
    NotSet,
}

impl Display for Source {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Environment => write!(f, "Environment variable"),

            Self::DotenvFile(Some(path)) => write!(f, ".env file ({})", path.display()),

            Self::DotenvFile(None) => write!(f, ".env file"),

            Self::Default => write!(f, "Default value"),

            Self::DevDefault => write!(f, "Dev default"),

            Self::TestDefault => write!(f, "Test default"),

            Self::NotSet => write!(f, "Not set"),
        }
    }
}

/// Source information for a single key.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ValueSource {
    /// The environment variable name.
    pub key: String,

    /// Where the value originated from.
    pub source: Source,
}

impl ValueSource {
    /// Creates a new `ValueSource`.
    pub fn new(key: impl Into<String>, source: Source) -> Self {
        Self {
            key: key.into(),
            source,
        }
    }
}

impl Display for ValueSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.source)
    }
}

/// Source attributions for every successfully resolved key, in resolution
/// order.
///
/// # Display Output
///
/// ```text
/// Configuration Source:
/// --------------------------------------------------
///   DATABASE_URL  <- Environment variable
///   PORT          <- Default value
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ConfigSources {
    entries: Vec<ValueSource>,
}

impl ConfigSources {
    /// Creates a new empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Records the source of `key`, replacing an earlier record for it.
    pub fn add(&mut self, key: impl Into<String>, source: Source) {
        let entry = ValueSource::new(key, source);
        match self.entries.iter_mut().find(|e| e.key == entry.key) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Returns all entries as a slice.
    #[must_use]
    pub fn entries(&self) -> &[ValueSource] {
        &self.entries
    }

    /// Looks up the source for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Source> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| &e.source)
    }

    /// Returns an iterator over keys and their sources.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Source)> {
        self.entries.iter().map(|e| (e.key.as_str(), &e.source))
    }
}

impl Display for ConfigSources {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Configuration Source:")?;
        writeln!(f, "{}", "-".repeat(50))?;

        let max_len = self.entries.iter().map(|e| e.key.len()).max().unwrap_or(0);

        for entry in &self.entries {
            writeln!(
                f,
                "  {:<width$}  <- {}",
                entry.key,
                entry.source,
                width = max_len,
            )?;
        }

        Ok(())
    }
}
