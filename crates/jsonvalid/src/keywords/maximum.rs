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

pub(crate) struct MaximumValidator {
    limit: Number,
    exclusive: bool,
    location: Location,
}

impl MaximumValidator {
    #[inline]
    pub(crate) fn compile(
        ctx: &compiler::Context,
        parent: &Map<String, Value>,
        schema: &Value,
    ) -> CompilationResult {
        let Value::Number(limit) = schema else {
            return Err(helpers::invalid(ctx, "maximum", "a number"));
        };
        let exclusive = match parent.get("exclusiveMaximum") {
            None => false,
            Some(Value::Bool(exclusive)) => *exclusive,
            Some(_) => return Err(helpers::invalid(ctx, "exclusiveMaximum", "a boolean")),
        };
        Ok(Box::new(MaximumValidator {
            limit: limit.clone(),
            exclusive,
            location: ctx.location().join("maximum"),
        }))
    }
}

impl Validate for MaximumValidator {
    fn validate<'s>(
        &'s self,
        instance: &Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        if let Value::Number(item) = instance {
            let fails = if self.exclusive {
                numeric::ge(item, &self.limit)
            } else {
                numeric::gt(item, &self.limit)
            };
            if fails {
                ctx.report(
                    location,
                    ViolationKind::Maximum,
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
    Some(MaximumValidator::compile(ctx, parent, schema))
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::json;

    #[test]
    fn maximum() {
        tests_util::is_valid(&json!({"maximum": 0}), &json!(0));
        tests_util::is_valid(&json!({"maximum": 1.5}), &json!(1));
        tests_util::expect_errors(
            &json!({"maximum": 0}),
            &json!(42),
            &["data is more than maximum"],
        );
    }

    #[test]
    fn exclusive() {
        let schema = json!({"maximum": 20, "exclusiveMaximum": true});
        tests_util::is_not_valid(&schema, &json!(20));
        tests_util::is_valid(&schema, &json!(19));
        tests_util::is_valid(&json!({"maximum": 20, "exclusiveMaximum": false}), &json!(20));
    }
}
