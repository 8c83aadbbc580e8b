//! Primitive kinds a schema can constrain a value to.
use std::{fmt, str::FromStr};

use serde_json::Value;

/// Magnitude beyond which an `f64` cannot carry a fractional part.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Kinds of values a `type` keyword may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonType {
    Array,
    Boolean,
    Integer,
    Null,
    Number,
    Object,
    String,
}

impl JsonType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            JsonType::Array => "array",
            JsonType::Boolean => "boolean",
            JsonType::Integer => "integer",
            JsonType::Null => "null",
            JsonType::Number => "number",
            JsonType::Object => "object",
            JsonType::String => "string",
        }
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }

    /// Whether `instance` is of this kind.
    #[must_use]
    pub fn matches(self, instance: &Value) -> bool {
        match (self, instance) {
            (JsonType::Array, Value::Array(_))
            | (JsonType::Boolean, Value::Bool(_))
            | (JsonType::Null, Value::Null)
            | (JsonType::Number, Value::Number(_))
            | (JsonType::Object, Value::Object(_))
            | (JsonType::String, Value::String(_)) => true,
            (JsonType::Integer, Value::Number(number)) => {
                if number.is_u64() || number.is_i64() {
                    return true;
                }
                number.as_f64().is_some_and(is_integral)
            }
            _ => false,
        }
    }
}

/// Doubles past the exactly representable range count as integers.
#[allow(clippy::float_cmp)]
fn is_integral(value: f64) -> bool {
    value.floor() == value || value.abs() > MAX_EXACT_INTEGER
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JsonType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "array" => Ok(JsonType::Array),
            "boolean" => Ok(JsonType::Boolean),
            "integer" => Ok(JsonType::Integer),
            "null" => Ok(JsonType::Null),
            "number" => Ok(JsonType::Number),
            "object" => Ok(JsonType::Object),
            "string" => Ok(JsonType::String),
            _ => Err(()),
        }
    }
}

/// A compact set of [`JsonType`] values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonTypeSet(u8);

impl JsonTypeSet {
    #[must_use]
    pub const fn empty() -> Self {
        JsonTypeSet(0)
    }

    #[must_use]
    pub const fn insert(self, ty: JsonType) -> Self {
        JsonTypeSet(self.0 | ty.bit())
    }

    #[must_use]
    pub const fn contains(self, ty: JsonType) -> bool {
        self.0 & ty.bit() != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether `instance` is of any kind in the set.
    #[must_use]
    pub fn matches(self, instance: &Value) -> bool {
        self.iter().any(|ty| ty.matches(instance))
    }

    pub fn iter(self) -> impl Iterator<Item = JsonType> {
        [
            JsonType::Array,
            JsonType::Boolean,
            JsonType::Integer,
            JsonType::Null,
            JsonType::Number,
            JsonType::Object,
            JsonType::String,
        ]
        .into_iter()
        .filter(move |ty| self.contains(*ty))
    }
}

impl From<JsonType> for JsonTypeSet {
    fn from(value: JsonType) -> Self {
        JsonTypeSet::empty().insert(value)
    }
}
