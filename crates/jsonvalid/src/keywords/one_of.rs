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

pub(crate) struct OneOfValidator {
    schemas: Vec<SchemaNode>,
    location: Location,
}

impl OneOfValidator {
    #[inline]
    pub(crate) fn compile<'a>(ctx: &compiler::Context<'a>, items: &'a [Value]) -> CompilationResult {
        let ctx = ctx.new_at_location("oneOf");
        let mut schemas = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            schemas.push(compiler::compile(&ctx.new_at_location(idx), item)?);
        }
        Ok(Box::new(OneOfValidator {
            schemas,
            location: ctx.location().clone(),
        }))
    }
}

impl Validate for OneOfValidator {
    fn validate<'s>(
        &'s self,
        instance: &Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        let mut passes = 0_usize;
        for node in &self.schemas {
            if node.is_valid(instance, ctx) {
                passes += 1;
            }
        }
        if passes != 1 {
            ctx.report(
                location,
                ViolationKind::OneOf,
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
        Value::Array(items) => Some(OneOfValidator::compile(ctx, items)),
        _ => Some(Err(helpers::invalid(ctx, "oneOf", "an array"))),
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    fn schema() -> Value {
        json!({"oneOf": [{"type": "integer"}, {"minimum": 2}]})
    }

    #[test_case(&json!(1))]
    #[test_case(&json!(2.5))]
    fn exactly_one(instance: &Value) {
        tests_util::is_valid(&schema(), instance);
    }

    #[test_case(&json!(3); "both")]
    #[test_case(&json!(1.5); "neither")]
    fn not_exactly_one(instance: &Value) {
        tests_util::expect_errors(&schema(), instance, &["data no (or more than one) schemas match"]);
    }

    #[test]
    fn location() {
        tests_util::assert_schema_location(&schema(), &json!(3), "/oneOf");
    }
}
