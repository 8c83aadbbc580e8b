use serde_json::json;

#[test]
fn value_and_type() {
    let validator = jsonvalid::options()
        .verbose(true)
        .build(&json!({
            "required": true,
            "type": "object",
            "properties": {"hello": {"required": true, "type": "string"}}
        }))
        .expect("Invalid schema");
    assert!(validator.is_valid(&json!({"hello": "string"})));
    let errors = validator
        .validate(&json!({"hello": 100}))
        .expect_err("Should fail");
    assert_eq!(errors[0].value, Some(json!(100)));
    assert_eq!(errors[0].expected_type, Some(json!("string")));
    assert_eq!(
        errors[0].schema_path.as_ref().map(|path| path.as_str()),
        Some("/properties/hello/type")
    );
}

#[test]
fn additional_property_path() {
    let validator = jsonvalid::options()
        .verbose(true)
        .build(&json!({"type": "object", "additionalProperties": false}))
        .expect("Invalid schema");
    assert!(validator.is_valid(&json!({})));
    let errors = validator.validate(&json!({"foo": "bar"})).expect_err("Should fail");
    assert_eq!(errors[0].value, Some(json!("data.foo")));
    assert_eq!(errors[0].expected_type, Some(json!("object")));
}

#[test]
fn nested_additional_property_path() {
    let validator = jsonvalid::options()
        .verbose(true)
        .build(&json!({
            "type": "object",
            "required": true,
            "additionalProperties": false,
            "properties": {
                "foo": {"type": "string"},
                "hello world": {
                    "type": "object",
                    "required": true,
                    "additionalProperties": false,
                    "properties": {"foo": {"type": "string"}}
                }
            }
        }))
        .expect("Invalid schema");
    let errors = validator
        .validate(&json!({"hello world": {"bar": "string"}}))
        .expect_err("Should fail");
    assert_eq!(errors[0].value, Some(json!("data[\"hello world\"].bar")));
}

#[test]
fn missing_value_has_no_value() {
    let validator = jsonvalid::options()
        .verbose(true)
        .build(&json!({"properties": {"a": {"type": "string", "required": true}}}))
        .expect("Invalid schema");
    let errors = validator.validate(&json!({})).expect_err("Should fail");
    assert_eq!(errors[0].value, None);
    assert_eq!(errors[0].expected_type, Some(json!("string")));
    assert_eq!(
        serde_json::to_value(&errors[0]).expect("Serializable"),
        json!({
            "field": "data.a",
            "message": "is required",
            "type": "string",
            "schemaPath": "/properties/a/required"
        })
    );
}

#[test]
fn plain_mode_has_no_details() {
    let errors = jsonvalid::validate(&json!({"type": "string"}), &json!(1)).expect_err("Should fail");
    assert_eq!(errors[0].value, None);
    assert_eq!(errors[0].expected_type, None);
    assert!(errors[0].schema_path.is_none());
}
