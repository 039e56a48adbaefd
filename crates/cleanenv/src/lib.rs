//! # cleanenv
//!
//! Declarative validation of environment variables into an immutable, typed
//! configuration.
//!
//! You describe every key once (its parser, defaults, allowed choices and
//! documentation) and `cleanenv` turns the raw process environment into a
//! frozen [`CleanEnv`]. Startup fails fast with a descriptive error listing
//! *every* missing or malformed key, instead of crashing somewhere downstream.
//!
//! ## Features
//!
//! - **Typed values** - built-in validators for strings, numbers, booleans,
//!   JSON, URLs, emails, hosts and ports, plus [`make_validator`] for your own
//! - **Error accumulation** - all configuration errors are reported at once
//! - **Mode-aware defaults** - dev-only defaults and test-only defaults
//! - **Conditional keys** - `required_when` makes a key required based on
//!   the values of other keys
//! - **Strict mode** - leave undeclared variables out and reject access to them
//! - **Source attribution** - see whether a value came from the environment,
//!   a `.env` file or a default
//! - **Rich diagnostics** - errors render beautifully via [`miette`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cleanenv::{Options, SpecMap, SpecOptions, clean_process_env};
//! use cleanenv::validators::{port, str, url};
//!
//! fn main() -> cleanenv::Result<()> {
//!     let specs = SpecMap::new()
//!         .with("DATABASE_URL", url(SpecOptions::new().desc("Primary database")))
//!         .with("PORT", port(SpecOptions::new().default("8080")))
//!         .with(
//!             "LOG_LEVEL",
//!             str(SpecOptions::new()
//!                 .choices(["error", "warn", "info", "debug"])
//!                 .default("info")
//!                 .dev_default("debug")),
//!         );
//!
//!     let env = clean_process_env(&specs, Options::default())?;
//!     println!("listening on {}", env["PORT"]);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Output Example
//!
//! ```text
//! cleanenv::multiple_errors
//!
//!   × 2 configuration error(s) occurred
//!
//! Error: cleanenv::missing_var
//!   × missing required environment variable: DATABASE_URL
//!   help: Primary database
//!
//! Error: cleanenv::invalid_value
//!   × invalid value for PORT: "http"
//!   help: invalid port number
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description | Default |
//! |---------|-------------|---------|
//! | `dotenv` | Merge a `.env` file under the environment | **Yes** |

#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    reason = "types are re-exported at the crate root"
)]

/// Re-export miette for error handling.
pub use miette;

/// Re-export `serde_json` for building and reading JSON values.
pub use serde_json;

/// Re-export dotenvy when the dotenv feature is enabled.
#[cfg(feature = "dotenv")]
pub use dotenvy;

// ============================================================================
// Core Modules
// ============================================================================

mod error;
pub use error::{Error, ParseError};

/// A Result type that displays errors with miette's fancy formatting.
///
/// Use this as your main function return type for pretty error output.
pub type Result<T> = miette::Result<T>;

mod source;
pub use source::{ConfigSources, Source, ValueSource};

pub mod value;
pub use value::EnvValue;

pub mod spec;
pub use spec::{
    Fallback, MODE_KEY, Mode, ParseFn, RequiredWhen, Spec, SpecMap, SpecOptions, Values,
    make_validator, test_only,
};

pub mod validators;

pub mod raw;
pub use raw::{RawEnv, RawVar};

pub mod engine;

mod options;
pub use options::{Options, Reporting, Transformer};

mod output;
pub use output::{CleanEnv, Draft};

mod reporter;
pub use reporter::{DefaultReporter, ErrorReport, Reporter};

pub mod loader;
pub use loader::{clean_env, clean_process_env};
