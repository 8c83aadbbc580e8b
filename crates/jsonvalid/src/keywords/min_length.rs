use serde_json::{Map, Value};

use crate::{
    accumulator::Offending,
    compiler,
    error::ViolationKind,
    keywords::{helpers, CompilationResult},
    paths::{LazyLocation, Location},
    validator::{Validate, ValidationContext},
};

pub(crate) struct MinLengthValidator {
    limit: u64,
    location: Location,
}

impl MinLengthValidator {
    #[inline]
    pub(crate) fn compile(ctx: &compiler::Context, schema: &Value) -> CompilationResult {
        let limit = helpers::compile_size(ctx, "minLength", schema)?;
        Ok(Box::new(MinLengthValidator {
            limit,
            location: ctx.location().join("minLength"),
        }))
    }
}

impl Validate for MinLengthValidator {
    fn validate<'s>(
        &'s self,
        instance: &Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        if let Value::String(item) = instance {
            if (bytecount::num_chars(item.as_bytes()) as u64) < self.limit {
                ctx.report(
                    location,
                    ViolationKind::MinLength,
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
    _: &'a Map<String, Value>,
    schema: &'a Value,
) -> Option<CompilationResult> {
    Some(MinLengthValidator::compile(ctx, schema))
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::json;

    #[test]
    fn location() {
        tests_util::assert_schema_location(&json!({"minLength": 1}), &json!(""), "/minLength");
    }

    #[test]
    fn too_short() {
        tests_util::expect_errors(
            &json!({"properties": {"name": {"minLength": 3}}}),
            &json!({"name": "ab"}),
            &["data.name has less length than allowed"],
        );
    }
}
