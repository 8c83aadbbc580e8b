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

pub(crate) struct EnumValidator {
    options: Vec<Value>,
    location: Location,
}

impl EnumValidator {
    #[inline]
    pub(crate) fn compile(items: &[Value], location: Location) -> CompilationResult {
        Ok(Box::new(EnumValidator {
            options: items.to_vec(),
            location,
        }))
    }
}

impl Validate for EnumValidator {
    fn validate<'s>(
        &'s self,
        instance: &Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        if !self.options.iter().any(|option| cmp::equal(instance, option)) {
            ctx.report(
                location,
                ViolationKind::Enum,
                Offending::Value(instance),
                &self.location,
            );
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
        // An empty list places no constraint
        Value::Array(items) if items.is_empty() => None,
        Value::Array(items) => Some(EnumValidator::compile(
            items,
            ctx.location().join("enum"),
        )),
        _ => Some(Err(helpers::invalid(ctx, "enum", "an array"))),
    }
}
