use serde_json::{Map, Value};

use crate::{
    accumulator::Offending,
    compiler,
    error::ViolationKind,
    keywords::{helpers, CompilationResult},
    paths::{LazyLocation, Location},
    validator::{Validate, ValidationContext},
};

pub(crate) struct MinItemsValidator {
    limit: u64,
    location: Location,
}

impl MinItemsValidator {
    #[inline]
    pub(crate) fn compile(ctx: &compiler::Context, schema: &Value) -> CompilationResult {
        let limit = helpers::compile_size(ctx, "minItems", schema)?;
        Ok(Box::new(MinItemsValidator {
            limit,
            location: ctx.location().join("minItems"),
        }))
    }
}

impl Validate for MinItemsValidator {
    fn validate<'s>(
        &'s self,
        instance: &Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        if let Value::Array(items) = instance {
            if (items.len() as u64) < self.limit {
                ctx.report(
                    location,
                    ViolationKind::MinItems,
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
    Some(MinItemsValidator::compile(ctx, schema))
}
