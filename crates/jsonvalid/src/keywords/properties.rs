use serde_json::{Map, Value};

use crate::{
    compiler,
    keywords::{helpers, CompilationResult},
    node::SchemaNode,
    paths::LazyLocation,
    validator::{Validate, ValidationContext},
};

pub(crate) struct PropertiesValidator {
    properties: Vec<(String, SchemaNode)>,
    /// `null` is allowed by a type union, in which case it has no properties to check.
    skip_null: bool,
}

impl PropertiesValidator {
    #[inline]
    pub(crate) fn compile<'a>(
        ctx: &compiler::Context<'a>,
        parent: &'a Map<String, Value>,
        map: &'a Map<String, Value>,
    ) -> CompilationResult {
        let ctx = ctx.new_at_location("properties");
        let mut properties = Vec::with_capacity(map.len());
        for (name, subschema) in map {
            let ctx = ctx.new_at_location(name);
            properties.push((name.clone(), compiler::compile(&ctx, subschema)?));
        }
        let skip_null = match parent.get("type") {
            Some(Value::Array(types)) => types.iter().any(|ty| ty.as_str() == Some("null")),
            _ => false,
        };
        Ok(Box::new(PropertiesValidator {
            properties,
            skip_null,
        }))
    }
}

impl Validate for PropertiesValidator {
    fn validate<'s>(
        &'s self,
        instance: &Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        match instance {
            Value::Null if self.skip_null => {}
            Value::Object(map) => {
                for (name, node) in &self.properties {
                    let location = location.push(name);
                    match map.get(name) {
                        Some(value) => node.validate(value, &location, ctx),
                        None => node.validate_absent(&location, ctx),
                    }
                }
            }
            // Other values have no properties, every declared one is absent
            _ => {
                for (name, node) in &self.properties {
                    node.validate_absent(&location.push(name), ctx);
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
            for (name, node) in &self.properties {
                node.apply_property(map, name, location, ctx);
            }
        } else {
            self.validate(instance, location, ctx);
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
        Value::Object(map) => Some(PropertiesValidator::compile(ctx, parent, map)),
        _ => Some(Err(helpers::invalid(ctx, "properties", "an object"))),
    }
}
