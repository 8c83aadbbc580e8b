use serde_json::{Map, Value};

use crate::{
    accumulator::Offending,
    compiler,
    error::ViolationKind,
    keywords::CompilationResult,
    node::SchemaNode,
    paths::{LazyLocation, Location},
    validator::{Validate, ValidationContext},
};

pub(crate) struct NotValidator {
    node: SchemaNode,
    location: Location,
}

impl NotValidator {
    #[inline]
    pub(crate) fn compile<'a>(ctx: &compiler::Context<'a>, schema: &'a Value) -> CompilationResult {
        let ctx = ctx.new_at_location("not");
        Ok(Box::new(NotValidator {
            node: compiler::compile(&ctx, schema)?,
            location: ctx.location().clone(),
        }))
    }
}

impl Validate for NotValidator {
    fn validate<'s>(
        &'s self,
        instance: &Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        if self.node.is_valid(instance, ctx) {
            ctx.report(
                location,
                ViolationKind::Not,
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
    Some(NotValidator::compile(ctx, schema))
}
