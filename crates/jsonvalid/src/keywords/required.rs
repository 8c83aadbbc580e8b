use serde_json::Value;

use crate::{
    accumulator::Offending,
    compiler,
    error::ViolationKind,
    keywords::helpers,
    paths::{LazyLocation, Location},
    validator::ValidationContext,
    SchemaError,
};

/// The object-level `required` list.
///
/// Unlike other keywords it reports how many properties are missing, as the node decides
/// whether the remaining checks run.
pub(crate) struct RequiredValidator {
    required: Vec<String>,
    location: Location,
}

impl RequiredValidator {
    #[inline]
    pub(crate) fn compile(
        ctx: &compiler::Context,
        schema: &Value,
    ) -> Result<RequiredValidator, SchemaError> {
        let Value::Array(items) = schema else {
            return Err(helpers::invalid(ctx, "required", "an array of strings"));
        };
        let mut required = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Value::String(name) => required.push(name.clone()),
                _ => return Err(helpers::invalid(ctx, "required", "an array of strings")),
            }
        }
        Ok(RequiredValidator {
            required,
            location: ctx.location().join("required"),
        })
    }

    /// Report every missing property at its own path. Non-objects have nothing missing.
    pub(crate) fn check(
        &self,
        instance: &Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'_>,
    ) -> usize {
        let Value::Object(map) = instance else {
            return 0;
        };
        let mut missing = 0;
        for name in &self.required {
            if !map.contains_key(name) {
                ctx.report(
                    &location.push(name),
                    ViolationKind::Required,
                    Offending::Value(instance),
                    &self.location,
                );
                missing += 1;
            }
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {"x": {"type": "number"}},
            "required": ["x", "y"]
        })
    }

    #[test_case(&json!({}), &["data.x is required", "data.y is required"])]
    #[test_case(&json!({"x": "string"}), &["data.y is required"])]
    #[test_case(&json!({"x": "string", "y": "value"}), &["data.x is the wrong type"])]
    fn not_greedy(instance: &Value, expected: &[&str]) {
        tests_util::expect_errors(&schema(), instance, expected);
    }

    #[test_case(&json!({}), &["data.x is required", "data.y is required"])]
    #[test_case(&json!({"x": "string"}), &["data.y is required", "data.x is the wrong type"])]
    #[test_case(&json!({"x": "string", "y": "value"}), &["data.x is the wrong type"])]
    fn greedy(instance: &Value, expected: &[&str]) {
        let validator = crate::options()
            .greedy(true)
            .build(&schema())
            .expect("Invalid schema");
        let errors = validator.validate(instance).expect_err("Should fail");
        let messages = errors.iter().map(ToString::to_string).collect::<Vec<_>>();
        assert_eq!(messages, expected);
    }

    #[test]
    fn greedy_valid() {
        let validator = crate::options()
            .greedy(true)
            .build(&schema())
            .expect("Invalid schema");
        assert!(validator.is_valid(&json!({"x": 1, "y": "value"})));
    }

    #[test]
    fn nested() {
        let schema = json!({
            "properties": {
                "x": {
                    "type": "object",
                    "properties": {
                        "y": {
                            "type": "object",
                            "properties": {"z": {"type": "string"}},
                            "required": ["z"]
                        }
                    }
                }
            },
            "required": ["x"]
        });
        tests_util::is_valid(&schema, &json!({"x": {}}));
        tests_util::expect_errors(&schema, &json!({}), &["data.x is required"]);
    }

    #[test]
    fn ignores_non_objects() {
        tests_util::is_valid(&json!({"required": ["a"]}), &json!([1, 2]));
    }

    #[test]
    fn location() {
        tests_util::assert_schema_location(&json!({"required": ["a"]}), &json!({}), "/required");
    }
}
