//! The validation run.
//!
//! [`clean_env`] is the main entry point. It settles every declared key in
//! two passes and accumulates errors rather than stopping on the first one:
//!
//! 1. **Unconditional keys** (no `required_when`) in declaration order.
//! 2. **Deferred keys** (with `required_when`) in declaration order, once the
//!    unconditional keys are settled. A deferred key that fails while its
//!    predicate is false is dropped without an error.
//!
//! Deferred keys are settled in a single pass: each is attempted exactly once
//! and its predicate only sees the values of unconditional keys, never those
//! of other deferred keys. Chains of conditional keys depending on each other
//! are not resolved.
//!
//! # Example
//!
//! ```rust,ignore
//! use cleanenv::{Options, RawEnv, SpecMap, SpecOptions, clean_env, validators::*};
//!
//! let specs = SpecMap::new()
//!     .with("PORT", port(SpecOptions::new().default("8080")))
//!     .with("TLS", bool(SpecOptions::new().default("false")))
//!     .with(
//!         "TLS_CERT",
//!         str(SpecOptions::new().required_when(|env| {
//!             env.get("TLS").and_then(|v| v.as_bool()) == Some(true)
//!         })),
//!     );
//!
//! let env = clean_env(RawEnv::from_process(), &specs, Options::default())?;
//! ```

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace};

use crate::engine::{self, Context};
use crate::error::Error;
use crate::options::Options;
use crate::output::{CleanEnv, Draft};
use crate::raw::RawEnv;
use crate::reporter::ErrorReport;
use crate::source::{ConfigSources, Source};
use crate::spec::{Spec, SpecMap, Values};
use crate::value::EnvValue;

/// What a run produced before assembly.
#[derive(Debug, Default)]
pub(crate) struct Outcome {
    pub(crate) values: Values,
    pub(crate) sources: ConfigSources,
    pub(crate) errors: BTreeMap<String, Error>,
}

/// Sequences validation across all keys of one run.
///
/// All state is local to the run, so concurrent runs never interfere.
pub(crate) struct Orchestrator<'a> {
    raw: &'a RawEnv,
    specs: &'a SpecMap,
    ctx: Context<'a>,
    collect: bool,
    outcome: Outcome,
}

impl<'a> Orchestrator<'a> {
    /// Creates an orchestrator. With `collect == false` the first missing
    /// or invalid value aborts the run.
    pub(crate) fn new(raw: &'a RawEnv, specs: &'a SpecMap, collect: bool) -> Self {
        Self {
            raw,
            specs,
            ctx: Context::resolve(raw, specs),
            collect,
            outcome: Outcome::default(),
        }
    }

    /// Runs both passes.
    ///
    /// # Errors
    ///
    /// Configuration errors always, and the first missing or invalid value
    /// when not collecting.
    pub(crate) fn run(mut self) -> Result<Outcome, Error> {
        let specs = self.specs;
        let mut deferred = Vec::new();

        for (key, spec) in specs.iter() {
            if spec.is_deferred() {
                debug!(key, "deferring conditional key");
                deferred.push((key, spec));
                continue;
            }

            if let Some((value, source)) = self.attempt(key, spec)? {
                self.commit(key, value, source);
            }
        }

        // Predicates see only unconditional keys, so settle every deferred
        // key before committing any of them.
        let mut settled = Vec::with_capacity(deferred.len());
        for (key, spec) in deferred {
            if let Some(result) = self.attempt(key, spec)? {
                settled.push((key, result));
            }
        }
        for (key, (value, source)) in settled {
            self.commit(key, value, source);
        }

        Ok(self.outcome)
    }

    /// Settles one key. `Ok(None)` means the key failed and its error was
    /// either recorded or discarded.
    fn attempt(
        &mut self,
        key: &str,
        spec: &Spec,
    ) -> Result<Option<(Option<EnvValue>, Source)>, Error> {
        let err = match engine::settle(key, spec, self.raw, self.ctx) {
            Ok(settled) => return Ok(Some(settled)),
            Err(err) if err.is_config() => return Err(err),
            Err(err) => err,
        };

        if let Some(required_when) = &spec.required_when
            && !required_when(&self.outcome.values)
        {
            trace!(key, error = %err, "conditional key not required, discarding failure");
            return Ok(None);
        }

        if !self.collect {
            return Err(err);
        }

        debug!(key, error = %err, "recording failure");
        self.outcome.errors.insert(key.to_string(), err);
        Ok(None)
    }

    fn commit(&mut self, key: &str, value: Option<EnvValue>, source: Source) {
        if let Some(value) = value {
            self.outcome.values.insert(key.to_string(), value);
        }
        self.outcome.sources.add(key, source);
    }
}

/// Validates `raw` against `specs` and returns the frozen environment.
///
/// The steps are:
/// - merge the `.env` file from `options` underneath `raw` (the caller's map is not touched)
/// - settle every key
/// - assemble the output
/// - apply the transformer
/// - hand the collected errors to the reporter
/// - freeze
///
/// # Errors
///
/// - [`Error::Config`] for a malformed spec, always immediately
/// - [`Error::Dotenv`] when the `.env` file exists but cannot be loaded
/// - the first missing or invalid value with [`Options::throw_on_error`]
/// - whatever the reporter returns otherwise
pub fn clean_env(raw: RawEnv, specs: &SpecMap, options: Options) -> Result<CleanEnv, Error> {
    let raw = with_dotenv(raw, &options)?;

    debug!(
        keys = specs.len(),
        strict = options.strict,
        collect = options.collects_errors(),
        "cleaning environment"
    );

    let Outcome {
        values,
        sources,
        errors,
    } = Orchestrator::new(&raw, specs, options.collects_errors()).run()?;

    let declared: BTreeSet<String> = specs.keys().map(str::to_string).collect();
    let mut draft = Draft::assemble(&raw, values, declared, sources, options.strict);

    if let Some(transformer) = &options.transformer {
        transformer(&mut draft);
    }

    if let Some(reporter) = options.reporter_ref() {
        reporter.report(ErrorReport {
            errors,
            env: &draft,
        })?;
    }

    Ok(draft.freeze())
}

#[cfg(feature = "dotenv")]
fn with_dotenv(mut raw: RawEnv, options: &Options) -> Result<RawEnv, Error> {
    if let Some(path) = &options.dotenv_path {
        raw.merge_dotenv(path)?;
    }
    Ok(raw)
}

#[cfg(not(feature = "dotenv"))]
#[allow(clippy::unnecessary_wraps)]
fn with_dotenv(raw: RawEnv, _options: &Options) -> Result<RawEnv, Error> {
    Ok(raw)
}

/// Validates the process environment.
///
/// Shorthand for `clean_env(RawEnv::from_process(), specs, options)`.
///
/// # Errors
///
/// See [`clean_env`].
pub fn clean_process_env(specs: &SpecMap, options: Options) -> Result<CleanEnv, Error> {
    clean_env(RawEnv::from_process(), specs, options)
}
