#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::float_cmp
)]

use serde_json::{Map, Value};

use crate::{
    accumulator::Offending,
    compiler,
    error::ViolationKind,
    ext::numeric,
    keywords::{helpers, CompilationResult},
    paths::{LazyLocation, Location},
    validator::{Validate, ValidationContext},
};

pub(crate) struct MultipleOfFloatValidator {
    multiple_of: f64,
    location: Location,
}

impl Validate for MultipleOfFloatValidator {
    fn validate<'s>(
        &'s self,
        instance: &Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        if let Some(item) = instance.as_f64() {
            if !numeric::is_multiple_of_float(item, self.multiple_of) {
                ctx.report(
                    location,
                    ViolationKind::MultipleOf,
                    Offending::Value(instance),
                    &self.location,
                );
            }
        }
    }
}

pub(crate) struct MultipleOfIntegerValidator {
    multiple_of: u64,
    location: Location,
}

impl MultipleOfIntegerValidator {
    fn is_multiple(&self, instance: &Value) -> bool {
        if let Some(item) = instance.as_u64() {
            item % self.multiple_of == 0
        } else if let Some(item) = instance.as_i64() {
            item.unsigned_abs() % self.multiple_of == 0
        } else if let Some(item) = instance.as_f64() {
            numeric::is_multiple_of_integer(item, self.multiple_of as f64)
        } else {
            true
        }
    }
}

impl Validate for MultipleOfIntegerValidator {
    fn validate<'s>(
        &'s self,
        instance: &Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        if !self.is_multiple(instance) {
            ctx.report(
                location,
                ViolationKind::MultipleOf,
                Offending::Value(instance),
                &self.location,
            );
        }
    }
}

#[inline]
pub(crate) fn compile<'a>(
    ctx: &compiler::Context<'a>,
    _: &'a Map<String, Value>,
    schema: &'a Value,
) -> Option<CompilationResult> {
    let location = ctx.location().join("multipleOf");
    if let Some(multiple_of) = schema.as_u64().filter(|value| *value > 0) {
        return Some(Ok(Box::new(MultipleOfIntegerValidator {
            multiple_of,
            location,
        })));
    }
    match schema.as_f64() {
        Some(multiple_of) if multiple_of > 0.0 => {
            if multiple_of.fract() == 0.0 && multiple_of < u64::MAX as f64 {
                Some(Ok(Box::new(MultipleOfIntegerValidator {
                    multiple_of: multiple_of as u64,
                    location,
                })))
            } else {
                Some(Ok(Box::new(MultipleOfFloatValidator {
                    multiple_of,
                    location,
                })))
            }
        }
        _ => Some(Err(helpers::invalid(ctx, "multipleOf", "a positive number"))),
    }
}
