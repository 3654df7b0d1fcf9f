//! Dynamic configuration trees produced by sources and folded by the merger.

use std::collections::BTreeMap;

mod convert;

#[cfg(test)]
mod tests;

/// Backing map of an object node. Sorted, so iteration is deterministic.
pub type Dict = BTreeMap<String, Value>;

/// A dynamically typed configuration value.
///
/// Sources produce `Value` trees, [`merge_value`](crate::merge_value) folds
/// them, and the decoder projects the fold onto a typed configuration
/// struct. `Null` is a stored value in its own right, distinct from an
/// absent key; the distinction is surfaced through [`Lookup`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Explicit null.
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed 64-bit integer.
    Integer(i64),
    /// Double-precision float.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Ordered list of values.
    Array(Vec<Value>),
    /// String-keyed object.
    Object(Dict),
}

impl Value {
    /// Static name of this value's kind, as used in mismatch diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// Whether this value is `Null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The boolean payload, when this is a `Bool`.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    /// The integer payload, when this is an `Integer`.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(number) => Some(*number),
            _ => None,
        }
    }

    /// The float payload, when this is a `Float`.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(number) => Some(*number),
            _ => None,
        }
    }

    /// The string payload, when this is a `String`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text),
            _ => None,
        }
    }

    /// The element list, when this is an `Array`.
    #[must_use]
    pub const fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// The backing map, when this is an `Object`.
    #[must_use]
    pub const fn as_object(&self) -> Option<&Dict> {
        match self {
            Self::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// Consume the value, returning the backing map when this is an
    /// `Object`.
    #[must_use]
    pub fn into_object(self) -> Option<Dict> {
        match self {
            Self::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up `key`, when this is an `Object`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Object(entries) => entries.get(key),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! value_from_integer {
    ($($int:ty),* $(,)?) => {
        $(
            impl From<$int> for Value {
                fn from(value: $int) -> Self {
                    Self::Integer(i64::from(value))
                }
            }
        )*
    };
}

value_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<Self>> for Value {
    fn from(value: Vec<Self>) -> Self {
        Self::Array(value)
    }
}

impl From<Dict> for Value {
    fn from(value: Dict) -> Self {
        Self::Object(value)
    }
}

/// Three-state result of a tree lookup.
///
/// Keeps a missing key distinct from a stored [`Value::Null`]. The decoder
/// treats both as "nothing here"; the parser and merger do not.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    /// No entry at the requested position.
    Absent,
    /// The stored value is `Null`.
    Null,
    /// A non-null stored value.
    Present(&'a Value),
}

impl<'a> Lookup<'a> {
    /// The looked-up value, when one is present.
    #[must_use]
    pub const fn value(self) -> Option<&'a Value> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent | Self::Null => None,
        }
    }

    /// Whether the position held no usable value.
    #[must_use]
    pub const fn is_vacant(self) -> bool {
        !matches!(self, Self::Present(_))
    }
}

impl<'a> From<Option<&'a Value>> for Lookup<'a> {
    fn from(value: Option<&'a Value>) -> Self {
        match value {
            None => Self::Absent,
            Some(Value::Null) => Self::Null,
            Some(present) => Self::Present(present),
        }
    }
}
