//! Typed validated values.
//!
//! The [`EnvValue`] enum is what parse functions produce and what a
//! [`CleanEnv`](crate::CleanEnv) stores. Numeric accessors go through
//! `num-traits` so callers can ask for the width they need:
//!
//! ```rust,ignore
//! use cleanenv::EnvValue;
//!
//! let value = EnvValue::Integer(8080);
//! let port: Option<u16> = value.to_u16();
//! ```

use std::fmt::{self, Display, Formatter};

use num_traits::ToPrimitive;

// ============================================================================
// Macros for reducing boilerplate
// ============================================================================

/// Generates `From<T>` implementations for `EnvValue`
macro_rules! impl_from_number {
    ($($t:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$t> for EnvValue {
                fn from(n: $t) -> Self {
                    EnvValue::$variant(n.into())
                }
            }
        )+
    };
}

/// Generates `to_*` methods that use `ToPrimitive`
macro_rules! impl_to_primitive {
    ($($method:ident -> $t:ty),+ $(,)?) => {
        $(
            #[doc = concat!("Converts to `", stringify!($t), "` if the value is numeric and fits.")]
            #[must_use]
            pub fn $method(&self) -> Option<$t> {
                match self {
                    EnvValue::Integer(n) => n.$method(),

                    EnvValue::Float(f) => f.$method(),

                    _ => None,
                }
            }
        )+
    };
}

// ============================================================================
// EnvValue Enum
// ============================================================================

/// A validated environment value.
///
/// | Variant | Produced by |
/// |---------|-------------|
/// | `String` | `str`, `url`, `email`, `host`, pass-through keys |
/// | `Integer` | `num` (integral input), `port` |
/// | `Float` | `num` (fractional input) |
/// | `Boolean` | `bool` |
/// | `Json` | `json` |
#[derive(Clone, Debug, PartialEq)]
pub enum EnvValue {
    /// A string value.
    String(String),

    /// A signed integer.
    Integer(i64),

    /// A floating-point value.
    Float(f64),

    /// A boolean value.
    Boolean(bool),

    /// An arbitrary JSON document.
    Json(serde_json::Value),
}

impl EnvValue {
    /// Returns the string slice for `String` values.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the flag for `Boolean` values.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the document for `Json` values.
    #[must_use]
    pub const fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(v) => Some(v),
            _ => None,
        }
    }

    /// Compares two values, treating numbers by magnitude so that
    /// `Integer(1)` and `Float(1.0)` are the same value.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Float(b)) | (Self::Float(b), Self::Integer(a)) => {
                a.to_f64().is_some_and(|a| a == *b)
            }
            _ => self == other,
        }
    }

    /// Short name of the variant, used in diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Boolean(_) => "boolean",
            Self::Json(_) => "json",
        }
    }

    impl_to_primitive! {
        to_i8 -> i8,
        to_i16 -> i16,
        to_i32 -> i32,
        to_i64 -> i64,
        to_u8 -> u8,
        to_u16 -> u16,
        to_u32 -> u32,
        to_u64 -> u64,
        to_usize -> usize,
        to_f32 -> f32,
        to_f64 -> f64,
    }
}

impl_from_number! {
    i8 => Integer,
    i16 => Integer,
    i32 => Integer,
    i64 => Integer,
    u8 => Integer,
    u16 => Integer,
    u32 => Integer,
    f32 => Float,
    f64 => Float,
}

impl From<bool> for EnvValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<&str> for EnvValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for EnvValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<serde_json::Value> for EnvValue {
    fn from(v: serde_json::Value) -> Self {
        Self::Json(v)
    }
}

impl Display for EnvValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s:?}"),

            Self::Integer(n) => write!(f, "{n}"),

            Self::Float(x) => write!(f, "{x}"),

            Self::Boolean(b) => write!(f, "{b}"),

            Self::Json(v) => write!(f, "{v}"),
        }
    }
}
