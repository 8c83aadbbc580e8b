use serde_json::{Map, Value};

use crate::{
    accumulator::Offending,
    compiler::{self, SubroutineId},
    error::ViolationKind,
    keywords::{helpers, CompilationResult},
    paths::{LazyLocation, Location},
    validator::{Validate, ValidationContext},
};

/// `$ref` to a compiled subroutine.
///
/// The target's own violations are not kept, a mismatch is reported once at this location.
pub(crate) struct RefValidator {
    id: SubroutineId,
    location: Location,
}

impl RefValidator {
    #[inline]
    pub(crate) fn compile(ctx: &compiler::Context, reference: &str) -> Option<CompilationResult> {
        match ctx.compile_reference(reference) {
            Ok(Some(id)) => Some(Ok(Box::new(RefValidator {
                id,
                location: ctx.location().join("$ref"),
            }))),
            Ok(None) => None,
            Err(error) => Some(Err(error)),
        }
    }
}

impl Validate for RefValidator {
    fn validate<'s>(
        &'s self,
        instance: &Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        let Some(node) = ctx.subroutine(self.id) else {
            return;
        };
        if !ctx.enter_subroutine(self.id, instance) {
            return;
        }
        let passed = ctx.probe(|ctx| node.validate(instance, location, ctx));
        ctx.leave_subroutine(self.id, instance);
        if !passed {
            ctx.report(
                location,
                ViolationKind::Reference,
                Offending::Value(instance),
                &self.location,
            );
        }
    }

    fn apply<'s>(
        &'s self,
        instance: &mut Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        let Some(node) = ctx.subroutine(self.id) else {
            return;
        };
        if !ctx.enter_subroutine(self.id, instance) {
            return;
        }
        let passed = ctx.probe(|ctx| node.apply(instance, location, ctx));
        ctx.leave_subroutine(self.id, instance);
        if !passed {
            ctx.report(
                location,
                ViolationKind::Reference,
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
        Value::String(reference) => RefValidator::compile(ctx, reference),
        _ => Some(Err(helpers::invalid(ctx, "$ref", "a string"))),
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    fn recursive() -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "children": {"type": "array", "items": {"$ref": "#"}}
            }
        })
    }

    #[test]
    fn recursive_valid() {
        tests_util::is_valid(
            &recursive(),
            &json!({"name": "a", "children": [{"name": "b", "children": [{"name": "c"}]}]}),
        );
    }

    #[test]
    fn recursive_invalid() {
        tests_util::expect_errors(
            &recursive(),
            &json!({"name": "a", "children": [{"name": "b", "children": [{"name": 1}]}]}),
            &["data.children[0] referenced schema does not match"],
        );
    }

    #[test_case(&json!({"definitions": {"s": {"type": "string"}}, "$ref": "#/definitions/s"}), &json!(1))]
    #[test_case(&json!({"definitions": {"s": {"id": "#s", "type": "string"}}, "$ref": "#s"}), &json!(1); "by id")]
    fn reports_once(schema: &Value, instance: &Value) {
        tests_util::expect_errors(schema, instance, &["data referenced schema does not match"]);
    }

    #[test]
    fn unresolvable_is_ignored() {
        tests_util::is_valid(&json!({"$ref": "#/definitions/missing", "type": "string"}), &json!("x"));
    }

    #[test_case(&json!({"definitions": {"x": "string"}, "properties": {"a": {"$ref": "#/definitions/x"}}}); "string")]
    #[test_case(&json!({"definitions": {"x": 5}, "properties": {"a": {"$ref": "#/definitions/x"}}}); "number")]
    #[test_case(&json!({"required": ["a"], "properties": {"a": {"$ref": "#/required"}}}); "array")]
    fn non_schema_target_is_ignored(schema: &Value) {
        tests_util::is_valid(schema, &json!({"a": 1}));
    }

    #[test]
    fn self_cycle_terminates() {
        let schema = json!({"definitions": {"a": {"$ref": "#/definitions/a"}}, "$ref": "#/definitions/a"});
        tests_util::is_valid(&schema, &json!(1));
    }

    #[test]
    fn location() {
        tests_util::assert_schema_location(
            &json!({"definitions": {"s": {"type": "string"}}, "$ref": "#/definitions/s"}),
            &json!(1),
            "/$ref",
        );
    }
}
