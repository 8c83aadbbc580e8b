//! Support for user-defined keywords.
use serde_json::{Map, Value};

use crate::{
    accumulator::Offending,
    compiler,
    error::ViolationKind,
    keywords::CompilationResult,
    paths::{LazyLocation, Location},
    validator::{Validate, ValidationContext},
    SchemaError,
};

/// Trait that allows implementing custom validation for keywords.
pub trait Keyword: Send + Sync {
    /// Validate `instance`.
    ///
    /// # Errors
    ///
    /// Returns the violation message, reported as [`crate::ViolationKind::Custom`].
    fn validate(&self, instance: &Value) -> Result<(), String>;

    /// Check whether `instance` is valid.
    fn is_valid(&self, instance: &Value) -> bool {
        self.validate(instance).is_ok()
    }
}

/// Builds a [`Keyword`] from the schema object containing it, the keyword value and its location.
pub trait KeywordFactory: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`SchemaError`] if the keyword value is malformed.
    fn init(
        &self,
        parent: &Map<String, Value>,
        value: &Value,
        location: Location,
    ) -> Result<Box<dyn Keyword>, SchemaError>;
}

impl<F> KeywordFactory for F
where
    F: Fn(&Map<String, Value>, &Value, Location) -> Result<Box<dyn Keyword>, SchemaError>
        + Send
        + Sync,
{
    fn init(
        &self,
        parent: &Map<String, Value>,
        value: &Value,
        location: Location,
    ) -> Result<Box<dyn Keyword>, SchemaError> {
        self(parent, value, location)
    }
}

pub(crate) struct CustomKeyword {
    inner: Box<dyn Keyword>,
    location: Location,
}

impl Validate for CustomKeyword {
    fn validate<'s>(
        &'s self,
        instance: &Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        if let Err(message) = self.inner.validate(instance) {
            ctx.report(
                location,
                ViolationKind::Custom(message),
                Offending::Value(instance),
                &self.location,
            );
        }
    }
}

pub(crate) fn compile<'a>(
    ctx: &compiler::Context<'a>,
    factory: &dyn KeywordFactory,
    parent: &'a Map<String, Value>,
    keyword: &str,
    value: &'a Value,
) -> CompilationResult {
    let location = ctx.location().join(keyword);
    let inner = factory.init(parent, value, location.clone())?;
    Ok(Box::new(CustomKeyword { inner, location }))
}
