use serde_json::{Map, Value};

use crate::{
    accumulator::Offending,
    compiler,
    error::ViolationKind,
    ext::cmp,
    keywords::{helpers, CompilationResult},
    paths::{LazyLocation, Location},
    validator::{Validate, ValidationContext},
};

pub(crate) struct UniqueItemsValidator {
    location: Location,
}

impl UniqueItemsValidator {
    #[inline]
    pub(crate) fn compile(location: Location) -> CompilationResult {
        Ok(Box::new(UniqueItemsValidator { location }))
    }
}

impl Validate for UniqueItemsValidator {
    fn validate<'s>(
        &'s self,
        instance: &Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        if let Value::Array(items) = instance {
            if !cmp::is_unique(items) {
                ctx.report(
                    location,
                    ViolationKind::UniqueItems,
                    Offending::Value(instance),
                    &self.location,
                );
            }
        }
    }
}

#[inline]
pub(crate) fn compile<'a>(
    ctx: &compiler::Context<'a>,
    _: &'a Map<String, Value>,
    schema: &'a Value,
) -> Option<CompilationResult> {
    match schema {
        Value::Bool(true) => Some(UniqueItemsValidator::compile(
            ctx.location().join("uniqueItems"),
        )),
        Value::Bool(false) => None,
        _ => Some(Err(helpers::invalid(ctx, "uniqueItems", "a boolean"))),
    }
}
