use serde_json::Value;

#[track_caller]
pub(crate) fn is_valid(schema: &Value, instance: &Value) {
    let validator = crate::validator_for(schema).expect("Invalid schema");
    assert!(
        validator.is_valid(instance),
        "{instance} should be valid (via is_valid)"
    );
    assert!(
        validator.validate(instance).is_ok(),
        "{instance} should be valid (via validate)"
    );
}

#[track_caller]
pub(crate) fn is_not_valid(schema: &Value, instance: &Value) {
    let validator = crate::validator_for(schema).expect("Invalid schema");
    assert!(
        !validator.is_valid(instance),
        "{instance} should not be valid (via is_valid)"
    );
    assert!(
        validator.validate(instance).is_err(),
        "{instance} should not be valid (via validate)"
    );
}

/// Check the rendered violations, in order.
#[track_caller]
pub(crate) fn expect_errors(schema: &Value, instance: &Value, expected: &[&str]) {
    is_not_valid(schema, instance);
    let validator = crate::validator_for(schema).expect("Invalid schema");
    let errors = validator.validate(instance).expect_err("Should fail");
    let messages = errors.iter().map(ToString::to_string).collect::<Vec<_>>();
    assert_eq!(messages, expected);
}

/// Check the schema path of the first violation.
#[track_caller]
pub(crate) fn assert_schema_location(schema: &Value, instance: &Value, expected: &str) {
    let validator = crate::options()
        .verbose(true)
        .build(schema)
        .expect("Invalid schema");
    let errors = validator.validate(instance).expect_err("Should fail");
    let location = errors[0]
        .schema_path
        .as_ref()
        .expect("Verbose violations carry a schema path");
    assert_eq!(location.as_str(), expected);
}
