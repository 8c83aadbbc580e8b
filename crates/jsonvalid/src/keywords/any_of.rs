use serde_json::{Map, Value};

use crate::{
    accumulator::Offending,
    compiler,
    error::ViolationKind,
    keywords::{helpers, CompilationResult},
    node::SchemaNode,
    paths::{LazyLocation, Location},
    validator::{Validate, ValidationContext},
};

pub(crate) struct AnyOfValidator {
    schemas: Vec<SchemaNode>,
    location: Location,
}

impl AnyOfValidator {
    #[inline]
    pub(crate) fn compile<'a>(ctx: &compiler::Context<'a>, items: &'a [Value]) -> CompilationResult {
        let ctx = ctx.new_at_location("anyOf");
        let mut schemas = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            schemas.push(compiler::compile(&ctx.new_at_location(idx), item)?);
        }
        Ok(Box::new(AnyOfValidator {
            schemas,
            location: ctx.location().clone(),
        }))
    }
}

impl Validate for AnyOfValidator {
    fn validate<'s>(
        &'s self,
        instance: &Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        // Stops at the first schema that passes
        if !self.schemas.iter().any(|node| node.is_valid(instance, ctx)) {
            ctx.report(
                location,
                ViolationKind::AnyOf,
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
        Value::Array(items) if items.is_empty() => None,
        Value::Array(items) => Some(AnyOfValidator::compile(ctx, items)),
        _ => Some(Err(helpers::invalid(ctx, "anyOf", "an array"))),
    }
}
