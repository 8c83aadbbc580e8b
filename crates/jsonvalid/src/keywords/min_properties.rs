use serde_json::{Map, Value};

use crate::{
    accumulator::Offending,
    compiler,
    error::ViolationKind,
    keywords::{helpers, CompilationResult},
    paths::{LazyLocation, Location},
    validator::{Validate, ValidationContext},
};

pub(crate) struct MinPropertiesValidator {
    limit: u64,
    location: Location,
}

impl MinPropertiesValidator {
    #[inline]
    pub(crate) fn compile(ctx: &compiler::Context, schema: &Value) -> CompilationResult {
        let limit = helpers::compile_size(ctx, "minProperties", schema)?;
        Ok(Box::new(MinPropertiesValidator {
            limit,
            location: ctx.location().join("minProperties"),
        }))
    }
}

impl Validate for MinPropertiesValidator {
    fn validate<'s>(
        &'s self,
        instance: &Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        if let Value::Object(map) = instance {
            if (map.len() as u64) < self.limit {
                ctx.report(
                    location,
                    ViolationKind::MinProperties,
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
    Some(MinPropertiesValidator::compile(ctx, schema))
}
