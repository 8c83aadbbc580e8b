use std::sync::Arc;

use fancy_regex::Regex;
use serde_json::{Map, Value};

use crate::{
    accumulator::Offending,
    compiler,
    error::ViolationKind,
    keywords::{helpers, CompilationResult},
    paths::{LazyLocation, Location},
    regex,
    validator::{Validate, ValidationContext},
};

pub(crate) struct PatternValidator {
    regex: Arc<Regex>,
    location: Location,
}

impl PatternValidator {
    #[inline]
    pub(crate) fn compile(ctx: &compiler::Context, pattern: &str) -> CompilationResult {
        let location = ctx.location().join("pattern");
        let regex = ctx.get_or_compile_regex(pattern, &location)?;
        Ok(Box::new(PatternValidator { regex, location }))
    }
}

impl Validate for PatternValidator {
    fn validate<'s>(
        &'s self,
        instance: &Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        if let Value::String(item) = instance {
            if !regex::is_match(&self.regex, item) {
                ctx.report(
                    location,
                    ViolationKind::Pattern,
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
    match schema {
        Value::String(pattern) => Some(PatternValidator::compile(ctx, pattern)),
        _ => Some(Err(helpers::invalid(ctx, "pattern", "a string"))),
    }
}
