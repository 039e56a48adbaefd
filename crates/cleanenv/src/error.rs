//! Error types for environment validation.
//!
//! This module contains the [`Error`] enum and related functionality for
//! reporting configuration problems with rich diagnostics via [`miette`].
//!
//! # Error Variants
//!
//! | Variant | When It Occurs |
//! |---------|----------------|
//! | [`Error::Missing`] | No raw value and no usable default |
//! | [`Error::Invalid`] | Raw value present but rejected by the parser |
//! | [`Error::InvalidChoice`] | Parsed value is not one of the declared choices |
//! | [`Error::Config`] | The spec itself is malformed (programming mistake) |
//! | [`Error::Undeclared`] | Strict-mode access to a key with no spec |
//! | [`Error::Dotenv`] | The `.env` file exists but could not be read |
//! | [`Error::Multiple`] | Several per-key errors collected in one run |
//!
//! # Error Accumulation
//!
//! Missing and invalid values are collected per key rather than returned on
//! the first failure, so a single run surfaces every problem at once.
//! Configuration errors are the exception: they abort the run immediately and
//! can never be collected or suppressed.
//!
//! ```rust,ignore
//! match cleanenv::clean_env(raw, specs, Options::default()) {
//!     Ok(env) => { /* use env */ }
//!     Err(Error::Multiple { errors }) => {
//!         for error in errors {
//!             eprintln!("{error}");
//!         }
//!     }
//!     Err(e) => eprintln!("{:?}", miette::Report::from(e)),
//! }
//! ```

#[cfg(feature = "dotenv")]
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error as ThisError;

/// Failure returned by a spec's parse function.
///
/// Parsers only describe what was wrong with the input; the key name and raw
/// value are attached by the engine when the failure becomes an [`Error`].
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{message}")]
pub struct ParseError {
    message: String,
}

impl ParseError {
    /// Creates a parse error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors that can occur while cleaning an environment.
///
/// # Diagnostic Codes
///
/// | Code | Meaning |
/// |------|---------|
/// | `cleanenv::missing_var` | Required environment variable not set |
/// | `cleanenv::invalid_value` | Value failed to parse |
/// | `cleanenv::invalid_choice` | Value not among the allowed choices |
/// | `cleanenv::config_error` | Malformed spec |
/// | `cleanenv::undeclared_key` | Strict access to an undeclared key |
/// | `cleanenv::dotenv_error` | `.env` file could not be loaded |
/// | `cleanenv::multiple_errors` | Multiple configuration errors occurred |
#[derive(Debug, ThisError, Diagnostic)]
pub enum Error {
    /// A required environment variable was not set and has no usable default.
    #[error("missing required environment variable: {key}")]
    #[diagnostic(
        code(cleanenv::missing_var),
        url("https://docs.rs/cleanenv"),
        severity(Error)
    )]
    Missing {
        /// The name of the missing variable.
        key: String,

        /// The formatted spec description, or a generic hint.
        #[help]
        help: String,
    },

    /// A raw value was present but the parser rejected it.
    #[error("invalid value for {key}: {value:?}")]
    #[diagnostic(code(cleanenv::invalid_value))]
    Invalid {
        /// The name of the variable.
        key: String,

        /// The raw string value that failed to parse.
        value: String,

        /// Help text derived from the spec description.
        #[help]
        help: String,

        /// What the parser reported.
        source: ParseError,
    },

    /// The parsed value is not one of the declared choices.
    #[error("value {value} for {key} is not one of [{}]", choices.join(", "))]
    #[diagnostic(code(cleanenv::invalid_choice))]
    InvalidChoice {
        /// The name of the variable.
        key: String,

        /// The rendered parsed value.
        value: String,

        /// The rendered allowed values, in declaration order.
        choices: Vec<String>,

        /// Help text listing the allowed values.
        #[help]
        help: String,
    },

    /// The spec for a key is malformed.
    ///
    /// This indicates a mistake in the spec map rather than bad input, so it
    /// is always returned immediately regardless of the reporting mode.
    #[error("invalid spec for {key}: {message}")]
    #[diagnostic(
        code(cleanenv::config_error),
        help("fix the spec declaration for this key")
    )]
    Config {
        /// The key whose spec is malformed.
        key: String,

        /// What is wrong with it.
        message: String,
    },

    /// A key with no spec was accessed on a strict environment.
    #[error("environment variable {key} is not declared in the spec map")]
    #[diagnostic(
        code(cleanenv::undeclared_key),
        help("add a spec for {key} or disable strict mode")
    )]
    Undeclared {
        /// The undeclared key.
        key: String,
    },

    /// The `.env` file exists but could not be read or parsed.
    #[cfg(feature = "dotenv")]
    #[error("failed to load dotenv file {}", path.display())]
    #[diagnostic(code(cleanenv::dotenv_error))]
    Dotenv {
        /// Path of the file.
        path: PathBuf,

        /// The underlying dotenvy error.
        source: dotenvy::Error,
    },

    /// Multiple configuration errors occurred.
    #[error("{} configuration error(s) occurred", errors.len())]
    #[diagnostic(
        code(cleanenv::multiple_errors),
        help("fix all listed configuration errors")
    )]
    Multiple {
        /// All accumulated errors, rendered together by miette.
        #[related]
        errors: Vec<Error>,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Constructor helpers for ergonomic error creation
// ─────────────────────────────────────────────────────────────────────────────

impl Error {
    /// Creates a Missing error.
    ///
    /// An empty `description` falls back to a generic hint.
    pub fn missing(key: impl Into<String>, description: impl Into<String>) -> Self {
        let key = key.into();
        let description = description.into();
        let help = if description.is_empty() {
            format!("set {key} in your environment or .env file")
        } else {
            description
        };
        Self::Missing { key, help }
    }

    /// Creates an Invalid error.
    pub fn invalid(
        key: impl Into<String>,
        value: impl Into<String>,
        description: impl Into<String>,
        source: ParseError,
    ) -> Self {
        let description = description.into();
        let help = if description.is_empty() {
            format!("{source}")
        } else {
            description
        };
        Self::Invalid {
            key: key.into(),
            value: value.into(),
            help,
            source,
        }
    }

    /// Creates an InvalidChoice error.
    pub fn invalid_choice(
        key: impl Into<String>,
        value: impl Into<String>,
        choices: Vec<String>,
    ) -> Self {
        let help = format!("allowed values are: {}", choices.join(", "));
        Self::InvalidChoice {
            key: key.into(),
            value: value.into(),
            choices,
            help,
        }
    }

    /// Creates a Config error.
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Collects multiple errors into a single Multiple error.
    /// Returns None if the input is empty.
    pub fn multiple(errors: Vec<Self>) -> Option<Self> {
        if errors.len() <= 1 {
            // Unwrap single error instead of wrapping
            errors.into_iter().next()
        } else {
            Some(Self::Multiple { errors })
        }
    }

    /// Returns `true` for spec mistakes, which are never collected.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    /// Returns the key this error is about, if it concerns a single key.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Missing { key, .. }
            | Self::Invalid { key, .. }
            | Self::InvalidChoice { key, .. }
            | Self::Config { key, .. }
            | Self::Undeclared { key } => Some(key),

            #[cfg(feature = "dotenv")]
            Self::Dotenv { .. } => None,

            Self::Multiple { .. } => None,
        }
    }
}
