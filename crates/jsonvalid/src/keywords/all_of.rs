use serde_json::{Map, Value};

use crate::{
    compiler,
    keywords::{helpers, CompilationResult},
    node::SchemaNode,
    paths::LazyLocation,
    validator::{Validate, ValidationContext},
};

pub(crate) struct AllOfValidator {
    schemas: Vec<SchemaNode>,
}

impl AllOfValidator {
    #[inline]
    pub(crate) fn compile<'a>(ctx: &compiler::Context<'a>, items: &'a [Value]) -> CompilationResult {
        let ctx = ctx.new_at_location("allOf");
        let mut schemas = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            schemas.push(compiler::compile(&ctx.new_at_location(idx), item)?);
        }
        Ok(Box::new(AllOfValidator { schemas }))
    }
}

impl Validate for AllOfValidator {
    fn validate<'s>(
        &'s self,
        instance: &Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        for node in &self.schemas {
            node.validate(instance, location, ctx);
        }
    }

    fn apply<'s>(
        &'s self,
        instance: &mut Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        for node in &self.schemas {
            node.apply(instance, location, ctx);
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
        Value::Array(items) => Some(AllOfValidator::compile(ctx, items)),
        _ => Some(Err(helpers::invalid(ctx, "allOf", "an array"))),
    }
}
