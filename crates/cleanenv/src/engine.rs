//! Raw value resolution and per-key validation.
//!
//! Resolution picks the raw value for a key:
//!
//! 1. An entry in the raw environment wins, verbatim.
//! 2. Otherwise the dev default, when the resolved mode is set and is not
//!    `production` and the spec declares one (even an empty one).
//! 3. Otherwise the plain default.
//!
//! A [`Fallback::TestOnly`] outside test mode fails right here with a
//! missing-value error. Validation then parses what resolution produced.

use tracing::debug;

use crate::error::{Error, ParseError};
use crate::raw::RawEnv;
use crate::source::Source;
use crate::spec::{Fallback, MODE_KEY, Mode, ParseFn, Spec, SpecMap};
use crate::value::EnvValue;

/// Mode information resolution depends on.
///
/// This is the *raw* mode (environment entry, else the mode spec's plain
/// default), since the validated mode is not known while other keys resolve.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Context<'a> {
    mode: Option<&'a str>,
}

impl<'a> Context<'a> {
    /// Resolves the raw mode for a run.
    #[must_use]
    pub fn resolve(raw: &'a RawEnv, specs: &'a SpecMap) -> Self {
        let mode = raw.get(MODE_KEY).or_else(|| {
            match specs.get(MODE_KEY).and_then(|spec| spec.default.as_ref()) {
                Some(Fallback::Raw(name)) => Some(name.as_str()),
                _ => None,
            }
        });
        Self { mode }
    }

    /// Context with an explicit raw mode.
    #[must_use]
    pub const fn with_mode(mode: Option<&'a str>) -> Self {
        Self { mode }
    }

    /// Returns the raw mode name.
    #[must_use]
    pub const fn mode(&self) -> Option<&'a str> {
        self.mode
    }

    /// Dev defaults apply only when a mode is set and it is not production.
    #[must_use]
    pub fn dev_defaults_apply(&self) -> bool {
        self.mode
            .is_some_and(|m| m != Mode::Production.as_str())
    }

    /// Returns `true` in test mode.
    #[must_use]
    pub fn is_test(&self) -> bool {
        self.mode == Some(Mode::Test.as_str())
    }
}

/// Result of resolution: the raw value (if any) and where it came from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Resolved {
    /// The effective raw value. `None` means nothing was provided.
    pub raw: Option<String>,

    /// Origin of `raw`.
    pub source: Source,
}

/// Rejects malformed specs.
///
/// # Errors
///
/// Returns [`Error::Config`] when the spec has no parse function or declares
/// an empty choice list.
pub fn check_spec<'s>(key: &str, spec: &'s Spec) -> Result<&'s ParseFn, Error> {
    let Some(parse) = spec.parse.as_ref() else {
        return Err(Error::config(key, "spec has no parse function"));
    };
    if spec.choices.as_ref().is_some_and(Vec::is_empty) {
        return Err(Error::config(key, "choices must not be empty"));
    }
    Ok(parse)
}

/// Determines the effective raw value for `key`.
///
/// # Errors
///
/// Returns [`Error::Missing`] when the selected default is test-only and the
/// mode is not `test`.
pub fn resolve(key: &str, spec: &Spec, raw: &RawEnv, ctx: Context<'_>) -> Result<Resolved, Error> {
    if let Some(var) = raw.get_var(key) {
        return Ok(Resolved {
            raw: Some(var.value.clone()),
            source: var.source.clone(),
        });
    }

    let (fallback, source) = match &spec.dev_default {
        Some(dev) if ctx.dev_defaults_apply() => (Some(dev), Source::DevDefault),
        _ => (spec.default.as_ref(), Source::Default),
    };

    match fallback {
        None | Some(Fallback::Absent) => Ok(Resolved {
            raw: None,
            source: Source::NotSet,
        }),

        Some(Fallback::Raw(value)) => Ok(Resolved {
            raw: Some(value.clone()),
            source,
        }),

        Some(Fallback::TestOnly(value)) if ctx.is_test() => Ok(Resolved {
            raw: Some(value.clone()),
            source: Source::TestDefault,
        }),

        Some(Fallback::TestOnly(_)) => Err(Error::missing(key, spec.description())),
    }
}

/// Validates a resolved raw value against its spec.
///
/// `Ok(None)` means the key is intentionally absent: no raw value, and the
/// declared default (or the applicable dev default) is [`Fallback::Absent`].
///
/// # Errors
///
/// - [`Error::Config`] for a malformed spec
/// - [`Error::Missing`] when there is no raw value and no absent default
/// - [`Error::Invalid`] when the parser rejects the value or yields nothing
/// - [`Error::InvalidChoice`] when the value is not among the choices
pub fn validate(
    key: &str,
    spec: &Spec,
    raw: Option<&str>,
    ctx: Context<'_>,
) -> Result<Option<EnvValue>, Error> {
    let parse = check_spec(key, spec)?;
    validate_with(key, spec, parse, raw, ctx)
}

fn validate_with(
    key: &str,
    spec: &Spec,
    parse: &ParseFn,
    raw: Option<&str>,
    ctx: Context<'_>,
) -> Result<Option<EnvValue>, Error> {
    let Some(raw) = raw else {
        let using_absent_default = spec.default == Some(Fallback::Absent)
            || (ctx.dev_defaults_apply() && spec.dev_default == Some(Fallback::Absent));

        return if using_absent_default {
            Ok(None)
        } else {
            Err(Error::missing(key, spec.description()))
        };
    };

    let value = parse(raw)
        .map_err(|e| Error::invalid(key, raw, spec.description(), e))?
        .ok_or_else(|| {
            Error::invalid(
                key,
                raw,
                spec.description(),
                ParseError::new("parser produced no value"),
            )
        })?;

    if let Some(choices) = &spec.choices
        && !choices.iter().any(|choice| choice.same_as(&value))
    {
        return Err(Error::invalid_choice(
            key,
            value.to_string(),
            choices.iter().map(ToString::to_string).collect(),
        ));
    }

    Ok(Some(value))
}

/// Resolves and validates one key.
///
/// # Errors
///
/// Any error from [`check_spec`], [`resolve`], or [`validate`].
pub fn settle(
    key: &str,
    spec: &Spec,
    raw: &RawEnv,
    ctx: Context<'_>,
) -> Result<(Option<EnvValue>, Source), Error> {
    // Malformed specs are reported before a test-only default can fail.
    let parse = check_spec(key, spec)?;

    let resolved = resolve(key, spec, raw, ctx)?;
    let value = validate_with(key, spec, parse, resolved.raw.as_deref(), ctx)?;

    debug!(key, source = %resolved.source, present = value.is_some(), "settled key");
    Ok((value, resolved.source))
}
