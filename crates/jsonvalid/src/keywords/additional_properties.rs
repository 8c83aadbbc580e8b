use std::sync::Arc;

use ahash::AHashSet;
use fancy_regex::Regex;
use serde_json::{Map, Value};

use crate::{
    accumulator::Offending,
    compiler,
    error::ViolationKind,
    keywords::{helpers, BoxedValidator, CompilationResult},
    node::SchemaNode,
    paths::{LazyLocation, Location},
    regex,
    validator::{Validate, ValidationContext},
    SchemaError,
};

/// Keys covered by `properties` (tuple positions when `items` is a list) or `patternProperties`.
pub(crate) struct Declared {
    names: AHashSet<String>,
    patterns: Vec<Arc<Regex>>,
}

impl Declared {
    fn compile<'a>(
        ctx: &compiler::Context<'a>,
        parent: &'a Map<String, Value>,
    ) -> Result<Declared, SchemaError> {
        let names = match (parent.get("items"), parent.get("properties")) {
            (Some(Value::Array(items)), _) => (0..items.len()).map(|idx| idx.to_string()).collect(),
            (_, Some(Value::Object(properties))) => properties.keys().cloned().collect(),
            _ => AHashSet::new(),
        };
        let mut patterns = Vec::new();
        if let Some(Value::Object(map)) = parent.get("patternProperties") {
            let location = ctx.location().join("patternProperties");
            for pattern in map.keys() {
                patterns.push(ctx.get_or_compile_regex(pattern, &location.join(pattern))?);
            }
        }
        Ok(Declared { names, patterns })
    }

    fn contains(&self, key: &str) -> bool {
        self.names.contains(key) || self.patterns.iter().any(|re| regex::is_match(re, key))
    }
}

/// `additionalProperties: false`. Undeclared keys are reported, or removed when filtering.
pub(crate) struct AdditionalPropertiesFalseValidator {
    declared: Declared,
    location: Location,
}

impl Validate for AdditionalPropertiesFalseValidator {
    fn validate<'s>(
        &'s self,
        instance: &Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        if let Value::Object(map) = instance {
            for key in map.keys() {
                if !self.declared.contains(key) {
                    ctx.report(
                        location,
                        ViolationKind::AdditionalProperties,
                        Offending::Path(&location.push(key)),
                        &self.location,
                    );
                }
            }
        }
    }

    fn apply<'s>(
        &'s self,
        instance: &mut Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        if !ctx.should_filter() {
            self.validate(instance, location, ctx);
        } else if let Value::Object(map) = instance {
            map.retain(|key, _| self.declared.contains(key));
        }
    }
}

/// `additionalProperties` with a schema for every undeclared key.
pub(crate) struct AdditionalPropertiesValidator {
    declared: Declared,
    node: SchemaNode,
}

impl Validate for AdditionalPropertiesValidator {
    fn validate<'s>(
        &'s self,
        instance: &Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        if let Value::Object(map) = instance {
            for (key, value) in map {
                if !self.declared.contains(key) {
                    self.node.validate(value, &location.push(key), ctx);
                }
            }
        }
    }

    fn apply<'s>(
        &'s self,
        instance: &mut Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        if let Value::Object(map) = instance {
            for (key, value) in map.iter_mut() {
                if !self.declared.contains(key) {
                    self.node.apply(value, &location.push(key), ctx);
                }
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
    match schema {
        Value::Bool(true) => None,
        Value::Bool(false) => Some(Declared::compile(ctx, parent).map(|declared| {
            Box::new(AdditionalPropertiesFalseValidator {
                declared,
                location: ctx.location().join("additionalProperties"),
            }) as BoxedValidator
        })),
        Value::Object(_) => Some(compile_schema(ctx, parent, schema)),
        _ => Some(Err(helpers::invalid(
            ctx,
            "additionalProperties",
            "a boolean or an object",
        ))),
    }
}

fn compile_schema<'a>(
    ctx: &compiler::Context<'a>,
    parent: &'a Map<String, Value>,
    schema: &'a Value,
) -> CompilationResult {
    let declared = Declared::compile(ctx, parent)?;
    let node = compiler::compile(&ctx.new_at_location("additionalProperties"), schema)?;
    Ok(Box::new(AdditionalPropertiesValidator { declared, node }))
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    fn closed() -> Value {
        json!({
            "properties": {"foo": {}},
            "patternProperties": {"^x-": {}},
            "additionalProperties": false
        })
    }

    #[test_case(&json!({"foo": 1}))]
    #[test_case(&json!({"foo": 1, "x-bar": 2}))]
    #[test_case(&json!([1, 2]); "ignores non-objects")]
    fn closed_valid(instance: &Value) {
        tests_util::is_valid(&closed(), instance);
    }

    #[test]
    fn closed_invalid() {
        tests_util::expect_errors(
            &closed(),
            &json!({"foo": 1, "bar": 2, "baz": 3}),
            &["data has additional properties", "data has additional properties"],
        );
    }

    #[test]
    fn reports_key_path_as_value() {
        let validator = crate::options()
            .verbose(true)
            .build(&json!({"properties": {"a": {"additionalProperties": false}}}))
            .expect("Invalid schema");
        let errors = validator
            .validate(&json!({"a": {"b b": 1}}))
            .expect_err("Should fail");
        assert_eq!(errors[0].field, "data.a");
        assert_eq!(errors[0].value, Some(json!("data.a[\"b b\"]")));
    }

    #[test]
    fn tuple_positions_are_declared() {
        let schema = json!({"items": [{}, {}], "additionalProperties": false});
        tests_util::is_valid(&schema, &json!([1, 2, 3]));
    }

    #[test]
    fn with_schema() {
        tests_util::expect_errors(
            &json!({"properties": {"a": {}}, "additionalProperties": {"type": "string"}}),
            &json!({"a": 1, "b": "x", "c": 2}),
            &["data.c is the wrong type"],
        );
    }

    #[test]
    fn location() {
        tests_util::assert_schema_location(&closed(), &json!({"y": 1}), "/additionalProperties");
    }
}
