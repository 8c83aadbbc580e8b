use serde_json::{Map, Value};

use crate::{
    accumulator::Offending,
    compiler,
    error::ViolationKind,
    keywords::{helpers, CompilationResult},
    paths::{LazyLocation, Location},
    validator::{Validate, ValidationContext},
};

pub(crate) struct MaxLengthValidator {
    limit: u64,
    location: Location,
}

impl MaxLengthValidator {
    #[inline]
    pub(crate) fn compile(ctx: &compiler::Context, schema: &Value) -> CompilationResult {
        let limit = helpers::compile_size(ctx, "maxLength", schema)?;
        Ok(Box::new(MaxLengthValidator {
            limit,
            location: ctx.location().join("maxLength"),
        }))
    }
}

impl Validate for MaxLengthValidator {
    fn validate<'s>(
        &'s self,
        instance: &Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        if let Value::String(item) = instance {
            if (bytecount::num_chars(item.as_bytes()) as u64) > self.limit {
                ctx.report(
                    location,
                    ViolationKind::MaxLength,
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
    Some(MaxLengthValidator::compile(ctx, schema))
}
