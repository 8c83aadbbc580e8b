#![allow(clippy::float_cmp, clippy::cast_sign_loss)]

use serde_json::Value;

use crate::{compiler, SchemaError};

/// Read a size limit such as `maxItems`. Integral floats are accepted.
pub(crate) fn compile_size(
    ctx: &compiler::Context,
    keyword: &'static str,
    schema: &Value,
) -> Result<u64, SchemaError> {
    if let Some(limit) = schema.as_u64() {
        return Ok(limit);
    }
    if let Some(limit) = schema.as_f64() {
        if limit >= 0.0 && limit.trunc() == limit {
            // NOTE: Imprecise cast as big integers are not supported
            #[allow(clippy::cast_possible_truncation)]
            return Ok(limit as u64);
        }
    }
    Err(SchemaError::invalid_keyword_value(
        ctx.location().join(keyword),
        keyword,
        "a non-negative integer",
    ))
}

/// Error for a keyword whose value has the wrong shape.
pub(crate) fn invalid(
    ctx: &compiler::Context,
    keyword: &'static str,
    expected: &'static str,
) -> SchemaError {
    SchemaError::invalid_keyword_value(ctx.location().join(keyword), keyword, expected)
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!({"maxItems": -1}))]
    #[test_case(&json!({"minLength": 1.5}))]
    #[test_case(&json!({"maxProperties": "1"}))]
    fn invalid_size(schema: &Value) {
        let error = crate::validator_for(schema).expect_err("Should fail");
        assert!(error.to_string().contains("a non-negative integer"));
    }

    #[test]
    fn integral_float_size() {
        let validator = crate::validator_for(&json!({"maxItems": 1.0})).expect("Invalid schema");
        assert!(!validator.is_valid(&json!([1, 2])));
    }
}
