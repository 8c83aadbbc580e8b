use serde_json::{Map, Value};

use crate::{
    accumulator::Offending,
    compiler,
    error::ViolationKind,
    keywords::{helpers, CompilationResult},
    node::SchemaNode,
    paths::{LazyLocation, Location},
    validator::{Validate, ValidationContext},
    SchemaError,
};

enum Dependency {
    /// Properties that must be present as well.
    Properties { names: Vec<String>, location: Location },
    /// Schema the whole object must match.
    Schema(SchemaNode),
}

pub(crate) struct DependenciesValidator {
    dependencies: Vec<(String, Dependency)>,
}

impl DependenciesValidator {
    #[inline]
    pub(crate) fn compile<'a>(
        ctx: &compiler::Context<'a>,
        map: &'a Map<String, Value>,
    ) -> CompilationResult {
        let ctx = ctx.new_at_location("dependencies");
        let mut dependencies = Vec::with_capacity(map.len());
        for (key, subschema) in map {
            let ctx = ctx.new_at_location(key);
            let dependency = match subschema {
                Value::String(name) => Dependency::Properties {
                    names: vec![name.clone()],
                    location: ctx.location().clone(),
                },
                Value::Array(names) => Dependency::Properties {
                    names: names
                        .iter()
                        .map(|name| match name {
                            Value::String(name) => Ok(name.clone()),
                            _ => Err(SchemaError::invalid_keyword_value(
                                ctx.location().clone(),
                                "dependencies",
                                "an array of strings",
                            )),
                        })
                        .collect::<Result<_, _>>()?,
                    location: ctx.location().clone(),
                },
                _ => Dependency::Schema(compiler::compile(&ctx, subschema)?),
            };
            dependencies.push((key.clone(), dependency));
        }
        Ok(Box::new(DependenciesValidator { dependencies }))
    }
}

impl Validate for DependenciesValidator {
    fn validate<'s>(
        &'s self,
        instance: &Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        let Value::Object(map) = instance else {
            return;
        };
        for (key, dependency) in &self.dependencies {
            if !map.contains_key(key) {
                continue;
            }
            match dependency {
                Dependency::Properties { names, location: schema_path } => {
                    if !names.iter().all(|name| map.contains_key(name)) {
                        ctx.report(
                            location,
                            ViolationKind::Dependencies,
                            Offending::Value(instance),
                            schema_path,
                        );
                    }
                }
                Dependency::Schema(node) => node.validate(instance, location, ctx),
            }
        }
    }

    fn apply<'s>(
        &'s self,
        instance: &mut Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        for (key, dependency) in &self.dependencies {
            let present = instance
                .as_object()
                .is_some_and(|map| map.contains_key(key));
            if !present {
                continue;
            }
            match dependency {
                Dependency::Properties { names, location: schema_path } => {
                    let satisfied = instance
                        .as_object()
                        .is_some_and(|map| names.iter().all(|name| map.contains_key(name)));
                    if !satisfied {
                        ctx.report(
                            location,
                            ViolationKind::Dependencies,
                            Offending::Value(&*instance),
                            schema_path,
                        );
                    }
                }
                Dependency::Schema(node) => node.apply(instance, location, ctx),
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
        Value::Object(map) => Some(DependenciesValidator::compile(ctx, map)),
        _ => Some(Err(helpers::invalid(ctx, "dependencies", "an object"))),
    }
}
