use serde_json::{Map, Value};

use crate::{
    accumulator::Offending,
    compiler,
    error::ViolationKind,
    keywords::{helpers, BoxedValidator, CompilationResult},
    node::SchemaNode,
    paths::{LazyLocation, Location},
    validator::{Validate, ValidationContext},
};

/// `items` with a single schema applied to every element.
pub(crate) struct ItemsValidator {
    node: SchemaNode,
}

impl ItemsValidator {
    #[inline]
    pub(crate) fn compile<'a>(ctx: &compiler::Context<'a>, schema: &'a Value) -> CompilationResult {
        let ctx = ctx.new_at_location("items");
        let node = compiler::compile(&ctx, schema)?;
        Ok(Box::new(ItemsValidator { node }))
    }
}

impl Validate for ItemsValidator {
    fn validate<'s>(
        &'s self,
        instance: &Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        if let Value::Array(items) = instance {
            for (idx, item) in items.iter().enumerate() {
                self.node.validate(item, &location.push(idx), ctx);
            }
        }
    }

    fn apply<'s>(
        &'s self,
        instance: &mut Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        if let Value::Array(items) = instance {
            for (idx, item) in items.iter_mut().enumerate() {
                self.node.apply(item, &location.push(idx), ctx);
            }
        }
    }
}

/// `items` with a list of schemas, one per position.
///
/// Positions behave like declared properties: an absent position is checked the same way as
/// an absent property.
pub(crate) struct TupleValidator {
    positions: Vec<SchemaNode>,
}

impl Validate for TupleValidator {
    fn validate<'s>(
        &'s self,
        instance: &Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        if let Value::Array(items) = instance {
            for (idx, node) in self.positions.iter().enumerate() {
                let location = location.push(idx);
                match items.get(idx) {
                    Some(item) => node.validate(item, &location, ctx),
                    None => node.validate_absent(&location, ctx),
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
        if let Value::Array(items) = instance {
            for (idx, node) in self.positions.iter().enumerate() {
                node.apply_item(items, idx, location, ctx);
            }
        }
    }
}

/// `additionalItems: false` next to a tuple.
pub(crate) struct AdditionalItemsFalseValidator {
    limit: usize,
    location: Location,
}

impl Validate for AdditionalItemsFalseValidator {
    fn validate<'s>(
        &'s self,
        instance: &Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        if let Value::Array(items) = instance {
            if items.len() > self.limit {
                ctx.report(
                    location,
                    ViolationKind::AdditionalItems,
                    Offending::Value(instance),
                    &self.location,
                );
            }
        }
    }
}

/// `additionalItems` with a schema for every element past the tuple.
pub(crate) struct AdditionalItemsValidator {
    node: SchemaNode,
    limit: usize,
}

impl Validate for AdditionalItemsValidator {
    fn validate<'s>(
        &'s self,
        instance: &Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        if let Value::Array(items) = instance {
            for (idx, item) in items.iter().enumerate().skip(self.limit) {
                self.node.validate(item, &location.push(idx), ctx);
            }
        }
    }

    fn apply<'s>(
        &'s self,
        instance: &mut Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        if let Value::Array(items) = instance {
            for (idx, item) in items.iter_mut().enumerate().skip(self.limit) {
                self.node.apply(item, &location.push(idx), ctx);
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
        // Handled by `compile_tuple`
        Value::Array(_) => None,
        _ => Some(ItemsValidator::compile(ctx, schema)),
    }
}

pub(crate) fn compile_tuple<'a>(
    ctx: &compiler::Context<'a>,
    items: &'a [Value],
) -> CompilationResult {
    let ctx = ctx.new_at_location("items");
    let mut positions = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        positions.push(compiler::compile(&ctx.new_at_location(idx), item)?);
    }
    Ok(Box::new(TupleValidator { positions }))
}

/// `additionalItems` only applies next to a tuple of `limit` positions.
pub(crate) fn compile_additional_items<'a>(
    ctx: &compiler::Context<'a>,
    parent: &'a Map<String, Value>,
    limit: usize,
) -> Option<CompilationResult> {
    match parent.get("additionalItems")? {
        Value::Bool(false) => Some(Ok(Box::new(AdditionalItemsFalseValidator {
            limit,
            location: ctx.location().join("additionalItems"),
        }))),
        Value::Bool(true) => None,
        schema @ Value::Object(_) => {
            let ctx = ctx.new_at_location("additionalItems");
            Some(
                compiler::compile(&ctx, schema)
                    .map(|node| Box::new(AdditionalItemsValidator { node, limit }) as BoxedValidator),
            )
        }
        _ => Some(Err(helpers::invalid(
            ctx,
            "additionalItems",
            "a boolean or an object",
        ))),
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!([1, 2, 3]))]
    #[test_case(&json!([]))]
    #[test_case(&json!("ab"); "ignores non-arrays")]
    fn items_valid(instance: &Value) {
        tests_util::is_valid(&json!({"items": {"type": "integer"}}), instance);
    }

    #[test]
    fn items_invalid() {
        tests_util::expect_errors(
            &json!({"items": {"type": "integer"}}),
            &json!([1, "a", 2, null]),
            &["data[1] is the wrong type", "data[3] is the wrong type"],
        );
    }

    #[test]
    fn tuple_forces_array() {
        tests_util::expect_errors(
            &json!({"items": [{"type": "string"}]}),
            &json!({"0": "a"}),
            &["data is the wrong type"],
        );
    }

    #[test]
    fn tuple_positions() {
        let schema = json!({"items": [{"type": "string"}, {"type": "integer", "required": true}]});
        tests_util::is_valid(&schema, &json!(["a", 1, null]));
        tests_util::expect_errors(&schema, &json!([1]), &["data[0] is the wrong type", "data[1] is required"]);
    }

    #[test_case(&json!(["a"]), true)]
    #[test_case(&json!(["a", "b"]), false)]
    fn additional_items_false(instance: &Value, expected: bool) {
        let schema = json!({"items": [{"type": "string"}], "additionalItems": false});
        if expected {
            tests_util::is_valid(&schema, instance);
        } else {
            tests_util::expect_errors(&schema, instance, &["data has additional items"]);
        }
    }

    #[test]
    fn additional_items_schema() {
        tests_util::expect_errors(
            &json!({"items": [{}], "additionalItems": {"type": "integer"}}),
            &json!(["x", 1, "y"]),
            &["data[2] is the wrong type"],
        );
    }

    #[test]
    fn additional_items_without_tuple() {
        tests_util::is_valid(&json!({"items": {}, "additionalItems": false}), &json!([1, 2]));
    }

    #[test_case(&json!({"items": {"type": "string"}}), &json!([1]), "/items/type")]
    #[test_case(&json!({"items": [{"type": "string"}]}), &json!([1]), "/items/0/type")]
    #[test_case(&json!({"items": [{}], "additionalItems": false}), &json!([1, 2]), "/additionalItems")]
    fn location(schema: &Value, instance: &Value, expected: &str) {
        tests_util::assert_schema_location(schema, instance, expected);
    }
}
