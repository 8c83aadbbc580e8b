use serde_json::{Map, Value};

use crate::{
    accumulator::Offending,
    error::ViolationKind,
    keywords::{required::RequiredValidator, BoxedValidator},
    paths::{LazyLocation, Location},
    types::JsonTypeSet,
    validator::ValidationContext,
};

/// A compiled schema object: the checks its keywords imply, in evaluation order.
pub(crate) struct SchemaNode {
    pub(crate) type_location: Location,
    pub(crate) required_location: Location,
    pub(crate) default: Option<Value>,
    /// `required: true` on the node itself.
    pub(crate) required: bool,
    pub(crate) types: Option<JsonTypeSet>,
    /// The `type` value as written, reported in verbose mode.
    pub(crate) declared_type: Option<Value>,
    /// Checks that run before the object-level `required` list.
    pub(crate) head: Vec<BoxedValidator>,
    pub(crate) required_properties: Option<RequiredValidator>,
    pub(crate) greedy: bool,
    pub(crate) tail: Vec<BoxedValidator>,
}

impl SchemaNode {
    /// A node that accepts everything.
    pub(crate) fn empty(location: &Location) -> SchemaNode {
        SchemaNode {
            type_location: location.join("type"),
            required_location: location.join("required"),
            default: None,
            required: false,
            types: None,
            declared_type: None,
            head: Vec::new(),
            required_properties: None,
            greedy: false,
            tail: Vec::new(),
        }
    }

    /// Check a present value without modifying it.
    pub(crate) fn validate<'s>(
        &'s self,
        instance: &Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        let previous = ctx.enter_node(self.declared_type.as_ref());
        if self.check_leading(instance, location, ctx) {
            for validator in &self.head {
                validator.validate(instance, location, ctx);
            }
            if self.check_required_properties(instance, location, ctx) {
                for validator in &self.tail {
                    validator.validate(instance, location, ctx);
                }
            }
        }
        ctx.leave_node(previous);
    }

    /// Check a present value, stripping rejected keys and injecting defaults where enabled.
    pub(crate) fn apply<'s>(
        &'s self,
        instance: &mut Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        let previous = ctx.enter_node(self.declared_type.as_ref());
        if self.check_leading(instance, location, ctx) {
            for validator in &self.head {
                validator.apply(instance, location, ctx);
            }
            if self.check_required_properties(instance, location, ctx) {
                for validator in &self.tail {
                    validator.apply(instance, location, ctx);
                }
            }
        }
        ctx.leave_node(previous);
    }

    /// Check a value that does not exist.
    ///
    /// A declared `default` satisfies the node, `required: true` reports it, anything else
    /// is skipped.
    pub(crate) fn validate_absent<'s>(
        &'s self,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        if self.required && self.default.is_none() {
            let previous = ctx.enter_node(self.declared_type.as_ref());
            ctx.report(
                location,
                ViolationKind::Required,
                Offending::Missing,
                &self.required_location,
            );
            ctx.leave_node(previous);
        }
    }

    /// Check the `name` property of `object`, injecting the default if it is absent.
    pub(crate) fn apply_property<'s>(
        &'s self,
        object: &mut Map<String, Value>,
        name: &str,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        let location = location.push(name);
        if let Some(value) = object.get_mut(name) {
            self.apply(value, &location, ctx);
        } else if let Some(default) = self.injectable_default(ctx) {
            let value = object.entry(name).or_insert(default.clone());
            self.apply(value, &location, ctx);
        } else {
            self.validate_absent(&location, ctx);
        }
    }

    /// Check the item at `idx`, appending the default if the array ends right before it.
    pub(crate) fn apply_item<'s>(
        &'s self,
        items: &mut Vec<Value>,
        idx: usize,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        let location = location.push(idx);
        if let Some(value) = items.get_mut(idx) {
            self.apply(value, &location, ctx);
            return;
        }
        match self.injectable_default(ctx) {
            Some(default) if items.len() == idx => {
                items.push(default.clone());
                if let Some(value) = items.last_mut() {
                    self.apply(value, &location, ctx);
                }
            }
            _ => self.validate_absent(&location, ctx),
        }
    }

    /// Whether `instance` passes, without recording anything.
    pub(crate) fn is_valid<'s>(&'s self, instance: &Value, ctx: &mut ValidationContext<'s>) -> bool {
        ctx.probe(|ctx| self.validate(instance, &LazyLocation::new(), ctx))
    }

    fn injectable_default(&self, ctx: &ValidationContext<'_>) -> Option<&Value> {
        self.default
            .as_ref()
            .filter(|_| ctx.should_inject_defaults())
    }

    /// The `type` check. Nothing else runs for a value of the wrong kind.
    fn check_leading(
        &self,
        instance: &Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'_>,
    ) -> bool {
        match self.types {
            Some(types) if !types.matches(instance) => {
                ctx.report(
                    location,
                    ViolationKind::Type,
                    Offending::Value(instance),
                    &self.type_location,
                );
                false
            }
            _ => true,
        }
    }

    /// The object-level `required` list. Unless greedy, missing properties stop the node.
    fn check_required_properties(
        &self,
        instance: &Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'_>,
    ) -> bool {
        let Some(required) = &self.required_properties else {
            return true;
        };
        let missing = required.check(instance, location, ctx);
        missing == 0 || self.greedy
    }
}

#[cfg(test)]
mod tests {
    use crate::tests_util;
    use serde_json::{json, Value};
    use test_case::test_case;

    #[test_case(&json!({"type": "string"}), &json!(1), "/type")]
    #[test_case(&json!({"properties": {"a": {"required": true}}}), &json!({}), "/properties/a/required")]
    fn location(schema: &Value, instance: &Value, expected: &str) {
        tests_util::assert_schema_location(schema, instance, expected);
    }

    #[test]
    fn wrong_type_stops_the_node() {
        tests_util::expect_errors(
            &json!({"type": "object", "required": ["a"], "minProperties": 2}),
            &json!([]),
            &["data is the wrong type"],
        );
    }

    #[test]
    fn absent_with_default_is_satisfied() {
        tests_util::is_valid(
            &json!({"properties": {"a": {"required": true, "default": 1}}}),
            &json!({}),
        );
    }

    #[test]
    fn absent_is_skipped() {
        tests_util::is_valid(
            &json!({"properties": {"a": {"type": "string", "minLength": 3}}}),
            &json!({}),
        );
    }

    #[test]
    fn non_object_parent_has_absent_children() {
        tests_util::expect_errors(
            &json!({"properties": {"a": {"required": true}}}),
            &json!(5),
            &["data.a is required"],
        );
    }
}
