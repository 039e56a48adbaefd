//! Output assembly and the frozen result.
//!
//! Validated values are merged over pass-through environment entries (unless
//! strict), the mode flags are fixed, and the result is handed out as a
//! [`Draft`] to the transformer and reporter. Freezing turns the draft into a
//! [`CleanEnv`], which has no mutating API at all.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Index;

use serde::de::DeserializeOwned;

use crate::error::Error;
use crate::raw::RawEnv;
use crate::source::ConfigSources;
use crate::spec::{MODE_KEY, Mode, Values};
use crate::value::EnvValue;

/// The assembled, not yet frozen output.
///
/// Transformers may add, replace, or remove values. The mode flags are fixed
/// at assembly time and cannot be changed through a draft.
#[derive(Clone, Debug, PartialEq)]
pub struct Draft {
    values: BTreeMap<String, EnvValue>,
    mode: Option<Mode>,
    declared: BTreeSet<String>,
    sources: ConfigSources,
    strict: bool,
}

impl Draft {
    /// Assembles the output of a run.
    ///
    /// Outside strict mode every raw entry passes through as a string, with
    /// validated values taking precedence.
    pub(crate) fn assemble(
        raw: &RawEnv,
        validated: Values,
        declared: BTreeSet<String>,
        sources: ConfigSources,
        strict: bool,
    ) -> Self {
        let mode = validated
            .get(MODE_KEY)
            .and_then(EnvValue::as_str)
            .and_then(Mode::from_name);

        let values = if strict {
            validated
        } else {
            let mut merged: BTreeMap<String, EnvValue> = raw
                .iter()
                .map(|(k, v)| (k.to_string(), EnvValue::from(v)))
                .collect();
            merged.extend(validated);
            merged
        };

        Self {
            values,
            mode,
            declared,
            sources,
            strict,
        }
    }

    /// Returns the value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&EnvValue> {
        self.values.get(key)
    }

    /// Sets a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<EnvValue>) -> Option<EnvValue> {
        self.values.insert(key.into(), value.into())
    }

    /// Removes a value.
    pub fn remove(&mut self, key: &str) -> Option<EnvValue> {
        self.values.remove(key)
    }

    /// Iterates values in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EnvValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The validated mode, if the mode key validated to a known mode.
    #[must_use]
    pub const fn mode(&self) -> Option<Mode> {
        self.mode
    }

    /// Locks the draft.
    #[must_use]
    pub fn freeze(self) -> CleanEnv {
        CleanEnv { inner: self }
    }
}

/// The validated, immutable environment.
///
/// There is no way to change a `CleanEnv` once built: it has no `&mut`
/// methods and implements [`Index`] but not `IndexMut`, so
/// `env["PORT"] = ...` does not compile.
///
/// ```rust,ignore
/// let env = cleanenv::clean_env(raw, &specs, Options::default())?;
///
/// let port = env.get_i64("PORT").unwrap_or(8080);
/// if env.is_production() {
///     // ...
/// }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CleanEnv {
    inner: Draft,
}

impl CleanEnv {
    /// Returns the value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&EnvValue> {
        self.inner.values.get(key)
    }

    /// Strict-aware lookup.
    ///
    /// # Errors
    ///
    /// On a strict environment, returns [`Error::Undeclared`] for keys that
    /// have no spec.
    pub fn try_get(&self, key: &str) -> Result<Option<&EnvValue>, Error> {
        if self.inner.strict && !self.inner.declared.contains(key) {
            return Err(Error::Undeclared {
                key: key.to_string(),
            });
        }
        Ok(self.get(key))
    }

    /// Returns a string value.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(EnvValue::as_str)
    }

    /// Returns a boolean value.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(EnvValue::as_bool)
    }

    /// Returns a numeric value as `i64`.
    #[must_use]
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(EnvValue::to_i64)
    }

    /// Returns a numeric value as `f64`.
    #[must_use]
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(EnvValue::to_f64)
    }

    /// Deserializes a JSON value into `T`.
    ///
    /// # Errors
    ///
    /// Returns the deserialization error if the document does not match `T`.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, serde_json::Error> {
        self.get(key)
            .and_then(EnvValue::as_json)
            .map(|v| serde_json::from_value(v.clone()))
            .transpose()
    }

    /// Returns `true` if `key` has a value.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.values.contains_key(key)
    }

    /// Iterates key names in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.inner.values.keys().map(String::as_str)
    }

    /// Iterates values in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EnvValue)> {
        self.inner.iter()
    }

    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.values.len()
    }

    /// Returns `true` if there are no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.values.is_empty()
    }

    /// Where each declared key's value came from.
    #[must_use]
    pub const fn sources(&self) -> &ConfigSources {
        &self.inner.sources
    }

    /// Returns `true` if undeclared keys were left out.
    #[must_use]
    pub const fn is_strict(&self) -> bool {
        self.inner.strict
    }

    /// The validated mode.
    #[must_use]
    pub const fn mode(&self) -> Option<Mode> {
        self.inner.mode
    }

    /// Mode is `development`.
    #[must_use]
    pub fn is_development(&self) -> bool {
        self.inner.mode == Some(Mode::Development)
    }

    /// Alias of [`is_development`](Self::is_development).
    #[must_use]
    pub fn is_dev(&self) -> bool {
        self.is_development()
    }

    /// Mode is `production`.
    #[must_use]
    pub fn is_production(&self) -> bool {
        self.inner.mode == Some(Mode::Production)
    }

    /// Alias of [`is_production`](Self::is_production).
    #[must_use]
    pub fn is_prod(&self) -> bool {
        self.is_production()
    }

    /// Mode is `test`.
    #[must_use]
    pub fn is_test(&self) -> bool {
        self.inner.mode == Some(Mode::Test)
    }
}

impl Index<&str> for CleanEnv {
    type Output = EnvValue;

    /// # Panics
    ///
    /// Panics if `key` has no value.
    fn index(&self, key: &str) -> &EnvValue {
        match self.get(key) {
            Some(value) => value,
            None => panic!("no value for environment variable {key}"),
        }
    }
}
