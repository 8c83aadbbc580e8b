//! Error types.
//!
//! Two kinds of failures exist: [`SchemaError`] is raised while compiling a schema and no
//! validator is produced, [`Violation`]s are collected while validating an instance and are
//! returned together as [`ValidationErrors`].
use std::{error, fmt, slice, vec};

use serde::{ser::SerializeMap, Serialize, Serializer};
use serde_json::Value;

use crate::paths::Location;

/// An error that prevents a schema from being compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    location: Location,
    kind: SchemaErrorKind,
}

/// Kinds of schema compilation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaErrorKind {
    /// A keyword that is neither built in nor registered as a custom keyword.
    UnknownKeyword(String),
    /// A `type` value outside of the supported kinds.
    UnknownType(String),
    /// A `format` name with no registered checker.
    UnrecognizedFormat(String),
    /// A pattern that could not be compiled.
    InvalidRegex { pattern: String, message: String },
    /// A keyword holds a value of an unexpected shape.
    InvalidKeywordValue {
        keyword: &'static str,
        expected: &'static str,
    },
    /// A subschema position holds something other than an object or a boolean.
    InvalidSchema,
    /// Raised by a custom keyword factory.
    Custom(String),
}

impl SchemaError {
    /// JSON Pointer to the offending part of the schema.
    #[must_use]
    pub fn location(&self) -> &Location {
        &self.location
    }

    #[must_use]
    pub fn kind(&self) -> &SchemaErrorKind {
        &self.kind
    }

    pub(crate) fn unknown_keyword(location: Location, keyword: &str) -> SchemaError {
        SchemaError {
            location,
            kind: SchemaErrorKind::UnknownKeyword(keyword.to_string()),
        }
    }

    pub(crate) fn unknown_type(location: Location, name: &str) -> SchemaError {
        SchemaError {
            location,
            kind: SchemaErrorKind::UnknownType(name.to_string()),
        }
    }

    pub(crate) fn unrecognized_format(location: Location, name: &str) -> SchemaError {
        SchemaError {
            location,
            kind: SchemaErrorKind::UnrecognizedFormat(name.to_string()),
        }
    }

    pub(crate) fn invalid_regex(
        location: Location,
        pattern: &str,
        error: &fancy_regex::Error,
    ) -> SchemaError {
        SchemaError {
            location,
            kind: SchemaErrorKind::InvalidRegex {
                pattern: pattern.to_string(),
                message: error.to_string(),
            },
        }
    }

    pub(crate) fn invalid_keyword_value(
        location: Location,
        keyword: &'static str,
        expected: &'static str,
    ) -> SchemaError {
        SchemaError {
            location,
            kind: SchemaErrorKind::InvalidKeywordValue { keyword, expected },
        }
    }

    pub(crate) fn invalid_schema(location: Location) -> SchemaError {
        SchemaError {
            location,
            kind: SchemaErrorKind::InvalidSchema,
        }
    }

    /// Create an error for a custom keyword that rejected its own value.
    pub fn custom(location: Location, message: impl Into<String>) -> SchemaError {
        SchemaError {
            location,
            kind: SchemaErrorKind::Custom(message.into()),
        }
    }
}

impl error::Error for SchemaError {}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SchemaErrorKind::UnknownKeyword(keyword) => {
                write!(f, "Keyword not supported: {keyword}")
            }
            SchemaErrorKind::UnknownType(name) => write!(f, "Unknown type: {name}"),
            SchemaErrorKind::UnrecognizedFormat(name) => {
                write!(f, "Unrecognized format used: {name}")
            }
            SchemaErrorKind::InvalidRegex { pattern, message } => {
                write!(f, "{pattern:?} is not a valid regular expression: {message}")
            }
            SchemaErrorKind::InvalidKeywordValue { keyword, expected } => {
                write!(f, "\"{keyword}\" must be {expected}")
            }
            SchemaErrorKind::InvalidSchema => {
                f.write_str("Schema must be an object or a boolean")
            }
            SchemaErrorKind::Custom(message) => f.write_str(message),
        }?;
        if !self.location.as_str().is_empty() {
            write!(f, " (at {})", self.location)?;
        }
        Ok(())
    }
}

/// The reason an instance failed a check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    Required,
    Type,
    AdditionalItems,
    Format(String),
    UniqueItems,
    Enum,
    Dependencies,
    AdditionalProperties,
    Reference,
    Not,
    Pattern,
    AnyOf,
    OneOf,
    MultipleOf,
    MaxProperties,
    MinProperties,
    MaxItems,
    MinItems,
    MaxLength,
    MinLength,
    Minimum,
    Maximum,
    /// Reported by a custom keyword.
    Custom(String),
}

impl ViolationKind {
    /// Human-readable message, e.g. `is required`.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message: &str = match self {
            ViolationKind::Required => "is required",
            ViolationKind::Type => "is the wrong type",
            ViolationKind::AdditionalItems => "has additional items",
            ViolationKind::Format(name) => return write!(f, "must be {name} format"),
            ViolationKind::UniqueItems => "must be unique",
            ViolationKind::Enum => "must be an enum value",
            ViolationKind::Dependencies => "dependencies not set",
            ViolationKind::AdditionalProperties => "has additional properties",
            ViolationKind::Reference => "referenced schema does not match",
            ViolationKind::Not => "negative schema matches",
            ViolationKind::Pattern => "pattern mismatch",
            ViolationKind::AnyOf => "no schemas match",
            ViolationKind::OneOf => "no (or more than one) schemas match",
            ViolationKind::MultipleOf => "has a remainder",
            ViolationKind::MaxProperties => "has more properties than allowed",
            ViolationKind::MinProperties => "has less properties than allowed",
            ViolationKind::MaxItems => "has more items than allowed",
            ViolationKind::MinItems => "has less items than allowed",
            ViolationKind::MaxLength => "has longer length than allowed",
            ViolationKind::MinLength => "has less length than allowed",
            ViolationKind::Minimum => "is less than minimum",
            ViolationKind::Maximum => "is more than maximum",
            ViolationKind::Custom(message) => message.as_str(),
        };
        f.write_str(message)
    }
}

/// A single failed check.
///
/// `value`, `expected_type` and `schema_path` are only filled in verbose mode.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Path to the offending field, e.g. `data.items[0]`.
    pub field: String,
    pub kind: ViolationKind,
    /// The offending value. For additional properties this is the path of the rejected key.
    pub value: Option<Value>,
    /// The `type` declared by the schema node that produced the violation.
    pub expected_type: Option<Value>,
    /// JSON Pointer to the keyword that produced the violation.
    pub schema_path: Option<Location>,
}

impl Violation {
    #[must_use]
    pub fn message(&self) -> String {
        self.kind.message()
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.kind)
    }
}

impl Serialize for Violation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("field", &self.field)?;
        map.serialize_entry("message", &self.kind.message())?;
        if let Some(value) = &self.value {
            map.serialize_entry("value", value)?;
        }
        if let Some(expected_type) = &self.expected_type {
            map.serialize_entry("type", expected_type)?;
        }
        if let Some(schema_path) = &self.schema_path {
            map.serialize_entry("schemaPath", schema_path.as_str())?;
        }
        map.end()
    }
}

/// All violations found in one validation run, in the order the checks ran.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors(Vec<Violation>);

impl ValidationErrors {
    pub(crate) fn new(violations: Vec<Violation>) -> Self {
        ValidationErrors(violations)
    }

    pub fn iter(&self) -> slice::Iter<'_, Violation> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Violation> {
        self.0
    }
}

impl std::ops::Index<usize> for ValidationErrors {
    type Output = Violation;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IntoIterator for ValidationErrors {
    type Item = Violation;
    type IntoIter = vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a Violation;
    type IntoIter = slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl error::Error for ValidationErrors {}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, violation) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{SchemaError, ValidationErrors, Violation, ViolationKind};
    use crate::paths::Location;
    use serde_json::json;
    use test_case::test_case;

    fn violation(field: &str, kind: ViolationKind) -> Violation {
        Violation {
            field: field.to_string(),
            kind,
            value: None,
            expected_type: None,
            schema_path: None,
        }
    }

    #[test_case(ViolationKind::Required, "is required")]
    #[test_case(ViolationKind::Format("email".into()), "must be email format")]
    #[test_case(ViolationKind::OneOf, "no (or more than one) schemas match")]
    #[test_case(ViolationKind::Custom("is odd".into()), "is odd")]
    fn messages(kind: ViolationKind, expected: &str) {
        assert_eq!(kind.message(), expected);
    }

    #[test]
    fn summary() {
        let errors = ValidationErrors::new(vec![
            violation("data.x", ViolationKind::Required),
            violation("data.y", ViolationKind::Type),
        ]);
        assert_eq!(
            errors.to_string(),
            "data.x is required\ndata.y is the wrong type"
        );
    }

    #[test]
    fn serialize_plain() {
        let value = serde_json::to_value(violation("data", ViolationKind::Enum)).expect("serializes");
        assert_eq!(value, json!({"field": "data", "message": "must be an enum value"}));
    }

    #[test]
    fn serialize_verbose() {
        let mut violation = violation("data.hello", ViolationKind::Type);
        violation.value = Some(json!(100));
        violation.expected_type = Some(json!("string"));
        violation.schema_path = Some(Location::new().join("properties").join("hello").join("type"));
        let value = serde_json::to_value(violation).expect("serializes");
        assert_eq!(
            value,
            json!({
                "field": "data.hello",
                "message": "is the wrong type",
                "value": 100,
                "type": "string",
                "schemaPath": "/properties/hello/type"
            })
        );
    }

    #[test]
    fn schema_error_display() {
        let error = SchemaError::unknown_keyword(Location::new().join("foo"), "foo");
        assert_eq!(error.to_string(), "Keyword not supported: foo (at /foo)");
    }
}
