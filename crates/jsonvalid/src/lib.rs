//! A compiler of JSON schemas into reusable validators.
//!
//! A schema is compiled once into a [`Validator`], which can then check any number of
//! instances. Besides plain validation, a validator can run in a mutating mode that strips
//! properties rejected by `additionalProperties: false` and fills absent fields with their
//! declared `default`.
//!
//! # Validation
//!
//! ```rust
//! use serde_json::json;
//!
//! let schema = json!({
//!     "required": true,
//!     "type": "object",
//!     "properties": {
//!         "hello": {"type": "string", "required": true}
//!     }
//! });
//! let validator = jsonvalid::validator_for(&schema).expect("Invalid schema");
//!
//! assert!(validator.is_valid(&json!({"hello": "world"})));
//!
//! let errors = validator.validate(&json!({"hello": 100})).expect_err("Should fail");
//! assert_eq!(errors.to_string(), "data.hello is the wrong type");
//! ```
//!
//! # Configuration
//!
//! Formats, external schemas for `$ref`, custom keywords and the output mode are configured
//! through [`ValidationOptions`]:
//!
//! ```rust
//! use serde_json::json;
//!
//! let validator = jsonvalid::options()
//!     .with_schema("definitions.json", json!({"sex": {"enum": ["male", "female"]}}))
//!     .verbose(true)
//!     .build(&json!({"properties": {"sex": {"$ref": "definitions.json#/sex"}}}))
//!     .expect("Invalid schema");
//!
//! let errors = validator.validate(&json!({"sex": "other"})).expect_err("Should fail");
//! assert_eq!(errors[0].field, "data.sex");
//! assert_eq!(errors[0].schema_path.as_ref().map(|path| path.as_str()), Some("/properties/sex/$ref"));
//! ```
//!
//! # Filtering
//!
//! ```rust
//! use serde_json::json;
//!
//! let schema = json!({
//!     "additionalProperties": false,
//!     "properties": {"name": {"type": "string"}, "role": {"default": "user"}}
//! });
//! let filtered = jsonvalid::filter(&schema, json!({"name": "a", "token": "secret"}))
//!     .expect("Invalid schema");
//!
//! assert_eq!(filtered, json!({"name": "a", "role": "user"}));
//! ```
mod accumulator;
mod compiler;
mod error;
mod ext;
mod formats;
mod keywords;
mod node;
mod options;
mod paths;
mod regex;
#[cfg(test)]
mod tests_util;
mod types;
mod validator;

pub use error::{SchemaError, SchemaErrorKind, ValidationErrors, Violation, ViolationKind};
pub use keywords::custom::{Keyword, KeywordFactory};
pub use options::ValidationOptions;
pub use paths::Location;
pub use types::{JsonType, JsonTypeSet};
pub use validator::Validator;

use serde_json::Value;

/// Create a validator for `schema` with default options.
///
/// # Errors
///
/// Returns an error if the schema is malformed, see [`ValidationOptions::build`].
pub fn validator_for(schema: &Value) -> Result<Validator, SchemaError> {
    options().build(schema)
}

/// Create a builder for configuring a validator.
///
/// ```rust
/// use serde_json::json;
///
/// let validator = jsonvalid::options()
///     .greedy(true)
///     .build(&json!({"required": ["a"], "properties": {"b": {"type": "string"}}}))
///     .expect("Invalid schema");
///
/// let errors = validator.validate(&json!({"b": 1})).expect_err("Should fail");
/// assert_eq!(errors.len(), 2);
/// ```
#[must_use]
pub fn options() -> ValidationOptions {
    Validator::options()
}

/// A shortcut for validating `instance` against `schema`.
///
/// ```rust
/// use serde_json::json;
///
/// assert!(jsonvalid::is_valid(&json!({"maxLength": 5}), &json!("foo")));
/// ```
///
/// # Panics
///
/// This function panics if an invalid schema is passed.
#[must_use]
#[inline]
pub fn is_valid(schema: &Value, instance: &Value) -> bool {
    validator_for(schema)
        .expect("Invalid schema")
        .is_valid(instance)
}

/// Validate `instance` against `schema` and collect every violation.
///
/// # Errors
///
/// Returns the violations if `instance` does not match `schema`.
///
/// # Panics
///
/// This function panics if an invalid schema is passed.
#[inline]
pub fn validate(schema: &Value, instance: &Value) -> Result<(), ValidationErrors> {
    validator_for(schema)
        .expect("Invalid schema")
        .validate(instance)
}

/// Strip properties rejected by `additionalProperties: false` from `instance` and fill in
/// declared defaults.
///
/// The filtered value is returned whether or not it matches the rest of the schema.
///
/// # Errors
///
/// Returns an error if the schema is malformed.
pub fn filter(schema: &Value, mut instance: Value) -> Result<Value, SchemaError> {
    let validator = options().should_filter(true).build(schema)?;
    let _ = validator.validate_mut(&mut instance);
    Ok(instance)
}
