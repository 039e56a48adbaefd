//! Built-in validators.
//!
//! Each validator is [`make_validator`] applied to one of the `parse_*` leaf
//! functions in this module, so `num(options)` and
//! `make_validator(parse_num)(options)` build the same spec.

use std::net::IpAddr;

use num_traits::ToPrimitive;

use validator::{ValidateEmail, ValidateUrl};

use crate::error::ParseError;
use crate::spec::{Spec, SpecOptions, make_validator};
use crate::value::EnvValue;

type ParseResult = Result<Option<EnvValue>, ParseError>;

/// Accepts any string.
pub fn str(options: SpecOptions) -> Spec {
    make_validator(parse_str)(options)
}

/// Accepts `1/0`, `true/false`, `t/f`, `yes/no`, `on/off` (any case).
pub fn bool(options: SpecOptions) -> Spec {
    make_validator(parse_bool)(options)
}

/// Accepts integers and finite floats.
pub fn num(options: SpecOptions) -> Spec {
    make_validator(parse_num)(options)
}

/// Accepts any JSON document.
pub fn json(options: SpecOptions) -> Spec {
    make_validator(parse_json)(options)
}

/// Accepts absolute URLs.
pub fn url(options: SpecOptions) -> Spec {
    make_validator(parse_url)(options)
}

/// Accepts email addresses.
pub fn email(options: SpecOptions) -> Spec {
    make_validator(parse_email)(options)
}

/// Accepts IP addresses and RFC 1123 hostnames.
pub fn host(options: SpecOptions) -> Spec {
    make_validator(parse_host)(options)
}

/// Accepts TCP/UDP port numbers (1-65535).
pub fn port(options: SpecOptions) -> Spec {
    make_validator(parse_port)(options)
}

// ============================================================================
// Leaf parsers
// ============================================================================

/// Parser behind [`str`].
pub fn parse_str(raw: &str) -> ParseResult {
    Ok(Some(EnvValue::String(raw.to_string())))
}

/// Parser behind [`bool`].
pub fn parse_bool(raw: &str) -> ParseResult {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "on" => Ok(Some(EnvValue::Boolean(true))),

        "0" | "false" | "f" | "no" | "off" => Ok(Some(EnvValue::Boolean(false))),

        _ => Err(ParseError::new("invalid bool input")),
    }
}

/// Parser behind [`num`].
pub fn parse_num(raw: &str) -> ParseResult {
    let trimmed = raw.trim();

    if let Ok(n) = trimmed.parse::<i64>() {
        return Ok(Some(EnvValue::Integer(n)));
    }

    match trimmed.parse::<f64>() {
        // "1.0" and "1e0" are the integer 1.
        Ok(f) if f.is_finite() && f.fract() == 0.0 => Ok(Some(
            f.to_i64().map_or(EnvValue::Float(f), EnvValue::Integer),
        )),
        Ok(f) if f.is_finite() => Ok(Some(EnvValue::Float(f))),
        _ => Err(ParseError::new("invalid number input")),
    }
}

/// Parser behind [`json`].
pub fn parse_json(raw: &str) -> ParseResult {
    serde_json::from_str(raw)
        .map(|v| Some(EnvValue::Json(v)))
        .map_err(|e| ParseError::new(format!("invalid json: {e}")))
}

/// Parser behind [`url`].
pub fn parse_url(raw: &str) -> ParseResult {
    let candidate = raw.to_string();
    if candidate.validate_url() {
        Ok(Some(EnvValue::String(candidate)))
    } else {
        Err(ParseError::new("invalid url"))
    }
}

/// Parser behind [`email`].
pub fn parse_email(raw: &str) -> ParseResult {
    let candidate = raw.to_string();
    if candidate.validate_email() {
        Ok(Some(EnvValue::String(candidate)))
    } else {
        Err(ParseError::new("invalid email address"))
    }
}

/// Parser behind [`host`].
pub fn parse_host(raw: &str) -> ParseResult {
    if raw.parse::<IpAddr>().is_ok() || is_hostname(raw) {
        Ok(Some(EnvValue::String(raw.to_string())))
    } else {
        Err(ParseError::new("invalid host (domain or ip)"))
    }
}

/// Parser behind [`port`].
pub fn parse_port(raw: &str) -> ParseResult {
    match raw.trim().parse::<u16>() {
        Ok(0) | Err(_) => Err(ParseError::new("invalid port number")),
        Ok(port) => Ok(Some(EnvValue::Integer(i64::from(port)))),
    }
}

fn is_hostname(raw: &str) -> bool {
    let name = raw.strip_suffix('.').unwrap_or(raw);

    !name.is_empty()
        && name.len() <= 253
        && name.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
        })
}
