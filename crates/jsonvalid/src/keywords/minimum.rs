use serde_json::{Map, Number, Value};

use crate::{
    accumulator::Offending,
    compiler,
    error::ViolationKind,
    ext::numeric,
    keywords::{helpers, CompilationResult},
    paths::{LazyLocation, Location},
    validator::{Validate, ValidationContext},
};

pub(crate) struct MinimumValidator {
    limit: Number,
    exclusive: bool,
    location: Location,
}

impl MinimumValidator {
    #[inline]
    pub(crate) fn compile(
        ctx: &compiler::Context,
        parent: &Map<String, Value>,
        schema: &Value,
    ) -> CompilationResult {
        let Value::Number(limit) = schema else {
            return Err(helpers::invalid(ctx, "minimum", "a number"));
        };
        let exclusive = match parent.get("exclusiveMinimum") {
            None => false,
            Some(Value::Bool(exclusive)) => *exclusive,
            Some(_) => return Err(helpers::invalid(ctx, "exclusiveMinimum", "a boolean")),
        };
        Ok(Box::new(MinimumValidator {
            limit: limit.clone(),
            exclusive,
            location: ctx.location().join("minimum"),
        }))
    }
}

impl Validate for MinimumValidator {
    fn validate<'s>(
        &'s self,
        instance: &Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        if let Value::Number(item) = instance {
            let fails = if self.exclusive {
                numeric::le(item, &self.limit)
            } else {
                numeric::lt(item, &self.limit)
            };
            if fails {
                ctx.report(
                    location,
                    ViolationKind::Minimum,
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
    parent: &'a Map<String, Value>,
    schema: &'a Value,
) -> Option<CompilationResult> {
    Some(MinimumValidator::compile(ctx, parent, schema))
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!(-42), false)]
    #[test_case(&json!(0), true)]
    #[test_case(&json!(-0.5), false)]
    #[test_case(&json!(u64::MAX), true)]
    #[test_case(&json!("-42"), true; "ignores non-numbers")]
    fn inclusive(instance: &Value, expected: bool) {
        let schema = json!({"minimum": 0});
        if expected {
            tests_util::is_valid(&schema, instance);
        } else {
            tests_util::expect_errors(&schema, instance, &["data is less than minimum"]);
        }
    }

    #[test_case(&json!(10), false)]
    #[test_case(&json!(10.0), false)]
    #[test_case(&json!(11), true)]
    fn exclusive(instance: &Value, expected: bool) {
        let validator = crate::validator_for(&json!({"minimum": 10, "exclusiveMinimum": true}))
            .expect("Invalid schema");
        assert_eq!(validator.is_valid(instance), expected);
    }

    #[test]
    fn exclusive_must_be_boolean() {
        assert!(crate::validator_for(&json!({"minimum": 1, "exclusiveMinimum": 1})).is_err());
    }

    #[test]
    fn location() {
        tests_util::assert_schema_location(&json!({"minimum": 1}), &json!(0), "/minimum");
    }
}
