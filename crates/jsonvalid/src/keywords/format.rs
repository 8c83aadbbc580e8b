//! `format` checks, resolved by name against user formats first and built-ins second.
use std::sync::Arc;

use fancy_regex::Regex;
use serde_json::Value;

use crate::{
    accumulator::Offending,
    compiler::{self, SubroutineId},
    error::ViolationKind,
    formats::{self, Format},
    keywords::{helpers, CompilationResult},
    paths::{LazyLocation, Location},
    regex,
    validator::{Validate, ValidationContext},
    SchemaError,
};

enum StringCheck {
    Builtin(fn(&str) -> bool),
    Predicate(Arc<dyn Fn(&str) -> bool + Send + Sync>),
    Pattern(Arc<Regex>),
}

impl StringCheck {
    #[inline]
    fn is_valid(&self, value: &str) -> bool {
        match self {
            StringCheck::Builtin(check) => check(value),
            StringCheck::Predicate(check) => check(value),
            StringCheck::Pattern(regex) => regex::is_match(regex, value),
        }
    }
}

/// A format checked on strings only.
pub(crate) struct FormatValidator {
    name: String,
    check: StringCheck,
    location: Location,
}

impl Validate for FormatValidator {
    fn validate<'s>(
        &'s self,
        instance: &Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        if let Value::String(item) = instance {
            if !self.check.is_valid(item) {
                ctx.report(
                    location,
                    ViolationKind::Format(self.name.clone()),
                    Offending::Value(instance),
                    &self.location,
                );
            }
        }
    }
}

/// A format defined as a schema. Its violations are reported as they are.
pub(crate) struct FormatSchemaValidator {
    id: SubroutineId,
}

impl Validate for FormatSchemaValidator {
    fn validate<'s>(
        &'s self,
        instance: &Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        let Some(node) = ctx.subroutine(self.id) else {
            return;
        };
        if ctx.enter_subroutine(self.id, instance) {
            node.validate(instance, location, ctx);
            ctx.leave_subroutine(self.id, instance);
        }
    }

    fn apply<'s>(
        &'s self,
        instance: &mut Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        let Some(node) = ctx.subroutine(self.id) else {
            return;
        };
        if ctx.enter_subroutine(self.id, instance) {
            node.apply(instance, location, ctx);
            ctx.leave_subroutine(self.id, instance);
        }
    }
}

#[inline]
pub(crate) fn compile<'a>(ctx: &compiler::Context<'a>, schema: &'a Value) -> CompilationResult {
    let Value::String(name) = schema else {
        return Err(helpers::invalid(ctx, "format", "a string"));
    };
    let location = ctx.location().join("format");
    let check = match ctx.config().formats.get(name) {
        Some(Format::Schema(definition)) => {
            let id = ctx.compile_format_schema(name, definition)?;
            return Ok(Box::new(FormatSchemaValidator { id }));
        }
        Some(Format::Predicate(check)) => StringCheck::Predicate(Arc::clone(check)),
        Some(Format::Pattern(pattern)) => {
            StringCheck::Pattern(ctx.get_or_compile_regex(&regex::anchored(pattern), &location)?)
        }
        None => match formats::builtin(name) {
            Some(check) => StringCheck::Builtin(check),
            None => return Err(SchemaError::unrecognized_format(location, name)),
        },
    };
    Ok(Box::new(FormatValidator {
        name: name.clone(),
        check,
        location,
    }))
}
