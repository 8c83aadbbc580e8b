use serde_json::{Map, Value};

use crate::{
    accumulator::Offending,
    compiler,
    error::ViolationKind,
    keywords::{helpers, CompilationResult},
    paths::{LazyLocation, Location},
    validator::{Validate, ValidationContext},
};

pub(crate) struct MaxItemsValidator {
    limit: u64,
    location: Location,
}

impl MaxItemsValidator {
    #[inline]
    pub(crate) fn compile(ctx: &compiler::Context, schema: &Value) -> CompilationResult {
        let limit = helpers::compile_size(ctx, "maxItems", schema)?;
        Ok(Box::new(MaxItemsValidator {
            limit,
            location: ctx.location().join("maxItems"),
        }))
    }
}

impl Validate for MaxItemsValidator {
    fn validate<'s>(
        &'s self,
        instance: &Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        if let Value::Array(items) = instance {
            if (items.len() as u64) > self.limit {
                ctx.report(
                    location,
                    ViolationKind::MaxItems,
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
    Some(MaxItemsValidator::compile(ctx, schema))
}
