//! Declarative per-key specs and the validator factory.
//!
//! A [`Spec`] describes how to obtain and validate one key: the parse
//! function, defaults, allowed choices, documentation metadata, and an
//! optional `required_when` predicate. Specs are usually built through a
//! validator such as [`num`](crate::validators::num), which is nothing more
//! than [`make_validator`] applied to a leaf parse function:
//!
//! ```rust,ignore
//! use cleanenv::{SpecMap, SpecOptions, validators::{num, str}};
//!
//! let specs = SpecMap::new()
//!     .with("PORT", num(SpecOptions::new().default("8080")))
//!     .with("LOG_LEVEL", str(SpecOptions::new().choices(["info", "debug"])));
//! ```

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::{self, Debug, Formatter, Write as _};
use std::sync::Arc;

use crate::error::ParseError;
use crate::value::EnvValue;

/// Name of the implicit mode key.
pub const MODE_KEY: &str = "NODE_ENV";

/// Validated values keyed by name.
pub type Values = BTreeMap<String, EnvValue>;

/// A spec's parse function.
///
/// `Ok(None)` means the parser produced no value, which the engine treats as
/// an invalid value.
pub type ParseFn = Arc<dyn Fn(&str) -> Result<Option<EnvValue>, ParseError> + Send + Sync>;

/// Predicate deciding whether a deferred key is required, given the values
/// validated so far.
pub type RequiredWhen = Arc<dyn Fn(&Values) -> bool + Send + Sync>;

// ============================================================================
// Mode
// ============================================================================

/// The three-way environment classification.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Mode {
    /// `development`
    Development,

    /// `test`
    Test,

    /// `production`
    #[default]
    Production,
}

impl Mode {
    /// All modes in their canonical order.
    pub const ALL: [Self; 3] = [Self::Development, Self::Test, Self::Production];

    /// Parses a mode name. Matching is exact.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == name)
    }

    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        }
    }
}

// ============================================================================
// Fallback
// ============================================================================

/// A declared default.
///
/// Whether a default is declared at all is expressed by wrapping this in an
/// `Option` on the spec, so "no default" and "default of nothing" stay
/// distinct.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Fallback {
    /// The key is intentionally absent when not provided.
    Absent,

    /// A raw value, validated exactly like an environment entry.
    Raw(String),

    /// A raw value usable only in test mode. In any other mode the key is
    /// treated as missing.
    TestOnly(String),
}

impl Fallback {
    /// Shorthand for [`Fallback::Raw`].
    pub fn raw(value: impl Into<String>) -> Self {
        Self::Raw(value.into())
    }
}

impl From<&str> for Fallback {
    fn from(value: &str) -> Self {
        Self::Raw(value.to_string())
    }
}

impl From<String> for Fallback {
    fn from(value: String) -> Self {
        Self::Raw(value)
    }
}

/// Declares a default that applies only in test mode.
pub fn test_only(value: impl Into<String>) -> Fallback {
    Fallback::TestOnly(value.into())
}

// ============================================================================
// Spec
// ============================================================================

/// Declarative description of one configuration key.
#[derive(Clone, Default)]
pub struct Spec {
    /// Parses a raw value. A spec without one is a configuration error.
    pub parse: Option<ParseFn>,

    /// Plain default, used when the key is not provided.
    pub default: Option<Fallback>,

    /// Default used instead of `default` outside production.
    pub dev_default: Option<Fallback>,

    /// Allowed validated values, in declaration order.
    pub choices: Option<Vec<EnvValue>>,

    /// Human-readable description.
    pub desc: Option<String>,

    /// Example value.
    pub example: Option<String>,

    /// Link to further documentation.
    pub docs: Option<String>,

    /// Makes the key conditionally required. Keys carrying this are settled
    /// after every other key.
    pub required_when: Option<RequiredWhen>,
}

impl Spec {
    /// Builds a spec from a parse function and options.
    pub fn custom<F>(parse: F, options: SpecOptions) -> Self
    where
        F: Fn(&str) -> Result<Option<EnvValue>, ParseError> + Send + Sync + 'static,
    {
        options.into_spec(Some(Arc::new(parse)))
    }

    /// Formats `desc`, `example`, and `docs` for missing-value messages.
    #[must_use]
    pub fn description(&self) -> String {
        let mut out = self.desc.clone().unwrap_or_default();
        if let Some(example) = &self.example {
            let _ = write!(out, " (eg. \"{example}\")");
        }
        if let Some(docs) = &self.docs {
            let _ = write!(out, ". See {docs}");
        }
        out.trim_start().to_string()
    }

    /// Returns `true` if the key is settled in the deferred pass.
    #[must_use]
    pub const fn is_deferred(&self) -> bool {
        self.required_when.is_some()
    }
}

impl Debug for Spec {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spec")
            .field("parse", &self.parse.as_ref().map(|_| "<fn>"))
            .field("default", &self.default)
            .field("dev_default", &self.dev_default)
            .field("choices", &self.choices)
            .field("desc", &self.desc)
            .field("example", &self.example)
            .field("docs", &self.docs)
            .field("required_when", &self.required_when.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

// ============================================================================
// SpecOptions & factory
// ============================================================================

/// Per-call options handed to a validator.
#[derive(Clone, Default)]
#[must_use]
pub struct SpecOptions {
    default: Option<Fallback>,
    dev_default: Option<Fallback>,
    choices: Option<Vec<EnvValue>>,
    desc: Option<String>,
    example: Option<String>,
    docs: Option<String>,
    required_when: Option<RequiredWhen>,
}

impl SpecOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        <Self as Default>::default()
    }

    /// Sets the plain default.
    #[allow(clippy::should_implement_trait)]
    pub fn default(mut self, fallback: impl Into<Fallback>) -> Self {
        self.default = Some(fallback.into());
        self
    }

    /// Sets the dev-only default.
    pub fn dev_default(mut self, fallback: impl Into<Fallback>) -> Self {
        self.dev_default = Some(fallback.into());
        self
    }

    /// Makes the key intentionally absent when not provided.
    pub fn optional(self) -> Self {
        self.default(Fallback::Absent)
    }

    /// Sets a default that applies only in test mode.
    pub fn test_only(self, value: impl Into<String>) -> Self {
        self.default(test_only(value))
    }

    /// Restricts the validated value to these choices.
    pub fn choices<I, V>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<EnvValue>,
    {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the description.
    pub fn desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    /// Sets the example value.
    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    /// Sets the documentation link.
    pub fn docs(mut self, docs: impl Into<String>) -> Self {
        self.docs = Some(docs.into());
        self
    }

    /// Makes the key required only when `predicate` holds for the values of
    /// the unconditional keys.
    pub fn required_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Values) -> bool + Send + Sync + 'static,
    {
        self.required_when = Some(Arc::new(predicate));
        self
    }

    /// Turns the options into a spec with the given parser.
    pub fn into_spec(self, parse: Option<ParseFn>) -> Spec {
        Spec {
            parse,
            default: self.default,
            dev_default: self.dev_default,
            choices: self.choices,
            desc: self.desc,
            example: self.example,
            docs: self.docs,
            required_when: self.required_when,
        }
    }
}

/// Builds a validator from a leaf parse function.
///
/// The returned closure turns per-call [`SpecOptions`] into a [`Spec`] that
/// shares the parse function.
pub fn make_validator<F>(parse: F) -> impl Fn(SpecOptions) -> Spec + Clone + Send + Sync
where
    F: Fn(&str) -> Result<Option<EnvValue>, ParseError> + Send + Sync + 'static,
{
    let parse: ParseFn = Arc::new(parse);
    move |options: SpecOptions| options.into_spec(Some(Arc::clone(&parse)))
}

// ============================================================================
// SpecMap
// ============================================================================

/// Ordered, key-unique mapping from names to specs.
///
/// A new map always starts with the implicit mode spec under [`MODE_KEY`]
/// (choices `development`, `test`, `production`, default `production`).
/// Inserting a spec for an existing key replaces it in place, so a user spec
/// for the mode key keeps the first position.
#[derive(Clone, Debug)]
pub struct SpecMap {
    entries: Vec<(String, Spec)>,
}

impl SpecMap {
    /// Creates a map holding only the implicit mode spec.
    #[must_use]
    pub fn new() -> Self {
        let mode = crate::validators::str(
            SpecOptions::new()
                .choices(Mode::ALL.map(Mode::as_str))
                .default(Mode::Production.as_str()),
        );
        Self {
            entries: vec![(MODE_KEY.to_string(), mode)],
        }
    }

    /// Adds or replaces a spec, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, spec: Spec) -> Self {
        self.insert(key, spec);
        self
    }

    /// Adds or replaces a spec.
    pub fn insert(&mut self, key: impl Into<String>, spec: Spec) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = spec,
            None => self.entries.push((key, spec)),
        }
    }

    /// Looks up a spec.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Spec> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, spec)| spec)
    }

    /// Returns `true` if a spec is declared for `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterates specs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Spec)> {
        self.entries.iter().map(|(k, spec)| (k.as_str(), spec))
    }

    /// Iterates key names in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Number of declared keys, including the mode key.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; the mode key is always declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders a `.env.example` template.
    ///
    /// Keys without a usable default are left blank, optional keys are
    /// commented out.
    #[must_use]
    pub fn env_example(&self) -> String {
        let mut out = String::new();

        for (key, spec) in self.iter() {
            if let Some(desc) = &spec.desc {
                let _ = writeln!(out, "# {desc}");
            }
            if let Some(example) = &spec.example {
                let _ = writeln!(out, "# Example: {example}");
            }
            if let Some(choices) = &spec.choices {
                let rendered: Vec<String> = choices.iter().map(ToString::to_string).collect();
                let _ = writeln!(out, "# One of: {}", rendered.join(", "));
            }
            if let Some(docs) = &spec.docs {
                let _ = writeln!(out, "# See: {docs}");
            }

            match &spec.default {
                Some(Fallback::Raw(value)) => {
                    let _ = writeln!(out, "{key}={}", quote_dotenv(value));
                }
                Some(Fallback::Absent) => {
                    let _ = writeln!(out, "# {key}=");
                }
                Some(Fallback::TestOnly(_)) | None => {
                    let _ = writeln!(out, "{key}=");
                }
            }
            out.push('\n');
        }

        out
    }
}

/// Quotes a value so a dotenv parser reads it back unchanged.
///
/// Single quotes keep the value literal. Values containing a single quote or
/// a newline use double quotes with escapes instead.
fn quote_dotenv(value: &str) -> Cow<'_, str> {
    let needs_quoting = value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '#' | '\'' | '"' | '\\' | '$'));
    if !needs_quoting {
        return Cow::Borrowed(value);
    }

    if !value.contains(['\'', '\n']) {
        return Cow::Owned(format!("'{value}'"));
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' | '\\' | '$' => {
                quoted.push('\\');
                quoted.push(c);
            }
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    Cow::Owned(quoted)
}

impl Default for SpecMap {
    fn default() -> Self {
        Self::new()
    }
}
