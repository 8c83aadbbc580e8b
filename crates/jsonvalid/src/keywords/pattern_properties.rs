use std::sync::Arc;

use fancy_regex::Regex;
use serde_json::{Map, Value};

use crate::{
    compiler,
    keywords::{helpers, CompilationResult},
    node::SchemaNode,
    paths::LazyLocation,
    regex,
    validator::{Validate, ValidationContext},
};

pub(crate) struct PatternPropertiesValidator {
    patterns: Vec<(Arc<Regex>, SchemaNode)>,
}

impl PatternPropertiesValidator {
    #[inline]
    pub(crate) fn compile<'a>(
        ctx: &compiler::Context<'a>,
        map: &'a Map<String, Value>,
    ) -> CompilationResult {
        let ctx = ctx.new_at_location("patternProperties");
        let mut patterns = Vec::with_capacity(map.len());
        for (pattern, subschema) in map {
            let ctx = ctx.new_at_location(pattern);
            let regex = ctx.get_or_compile_regex(pattern, ctx.location())?;
            patterns.push((regex, compiler::compile(&ctx, subschema)?));
        }
        Ok(Box::new(PatternPropertiesValidator { patterns }))
    }
}

impl Validate for PatternPropertiesValidator {
    fn validate<'s>(
        &'s self,
        instance: &Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        if let Value::Object(map) = instance {
            for (key, value) in map {
                for (regex, node) in &self.patterns {
                    if regex::is_match(regex, key) {
                        node.validate(value, &location.push(key), ctx);
                    }
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
                for (regex, node) in &self.patterns {
                    if regex::is_match(regex, key) {
                        node.apply(value, &location.push(key), ctx);
                    }
                }
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
    match schema {
        Value::Object(map) if map.is_empty() => None,
        Value::Object(map) => Some(PatternPropertiesValidator::compile(ctx, map)),
        _ => Some(Err(helpers::invalid(ctx, "patternProperties", "an object"))),
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::json;

    #[test]
    fn matching_keys() {
        let schema = json!({"patternProperties": {"^s_": {"type": "string"}, "n$": {"type": "number"}}});
        tests_util::is_valid(&schema, &json!({"s_a": "x", "bn": 1, "other": null}));
        tests_util::expect_errors(
            &schema,
            &json!({"s_n": true}),
            &["data.s_n is the wrong type", "data.s_n is the wrong type"],
        );
    }

    #[test]
    fn location() {
        tests_util::assert_schema_location(
            &json!({"patternProperties": {"^a": {"type": "string"}}}),
            &json!({"ab": 1}),
            "/patternProperties/^a/type",
        );
    }
}
