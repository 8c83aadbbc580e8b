use std::{ptr, sync::OnceLock};

use ahash::AHashSet;
use serde_json::Value;

use crate::{
    accumulator::{ErrorAccumulator, Offending},
    compiler::SubroutineId,
    error::{ValidationErrors, ViolationKind},
    node::SchemaNode,
    options::ValidationOptions,
    paths::{LazyLocation, Location},
};

/// The Validate trait represents a predicate over some JSON value. Some validators are very
/// simple predicates such as "a value which is a string", whereas others may be much more
/// complex, consisting of several other validators composed together in various ways.
///
/// Failures are not returned, they are reported to the [`ValidationContext`] which counts
/// them and, when asked to, records them.
pub(crate) trait Validate: Send + Sync {
    fn validate<'s>(
        &'s self,
        instance: &Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    );

    /// Same as `validate`, but may modify `instance`.
    ///
    /// Only keywords that hand values down to subschemas, or that strip data, override it.
    fn apply<'s>(
        &'s self,
        instance: &mut Value,
        location: &LazyLocation,
        ctx: &mut ValidationContext<'s>,
    ) {
        self.validate(instance, location, ctx);
    }
}

/// Per-run state: the error accumulator, access to compiled subroutines and the mode flags.
pub(crate) struct ValidationContext<'s> {
    pub(crate) errors: ErrorAccumulator,
    subroutines: &'s [OnceLock<SchemaNode>],
    expected_type: Option<&'s Value>,
    filter: bool,
    use_defaults: bool,
    /// Subroutines currently running, with the address of the value they run on.
    active: AHashSet<(SubroutineId, usize)>,
}

impl<'s> ValidationContext<'s> {
    fn new(errors: ErrorAccumulator, subroutines: &'s [OnceLock<SchemaNode>]) -> Self {
        ValidationContext {
            errors,
            subroutines,
            expected_type: None,
            filter: false,
            use_defaults: false,
            active: AHashSet::new(),
        }
    }

    #[inline]
    pub(crate) fn report(
        &mut self,
        location: &LazyLocation,
        kind: ViolationKind,
        offending: Offending<'_>,
        schema_path: &Location,
    ) {
        self.errors
            .report(location, kind, offending, self.expected_type, schema_path);
    }

    /// Make `declared_type` the type reported by violations until [`Self::leave_node`].
    #[inline]
    pub(crate) fn enter_node(&mut self, declared_type: Option<&'s Value>) -> Option<&'s Value> {
        std::mem::replace(&mut self.expected_type, declared_type)
    }

    #[inline]
    pub(crate) fn leave_node(&mut self, previous: Option<&'s Value>) {
        self.expected_type = previous;
    }

    /// Run `check` speculatively and tell whether it passed.
    ///
    /// Nothing `check` reports is kept.
    pub(crate) fn probe(&mut self, check: impl FnOnce(&mut Self)) -> bool {
        let mark = self.errors.mark();
        self.errors.suspend();
        check(self);
        let passed = !self.errors.grew_since(mark);
        self.errors.rewind(mark);
        self.errors.resume();
        passed
    }

    pub(crate) fn should_filter(&self) -> bool {
        self.filter
    }

    pub(crate) fn should_inject_defaults(&self) -> bool {
        self.filter || self.use_defaults
    }

    pub(crate) fn subroutine(&self, id: SubroutineId) -> Option<&'s SchemaNode> {
        self.subroutines.get(id).and_then(OnceLock::get)
    }

    /// Mark subroutine `id` as running on `instance`.
    ///
    /// Returns `false` if it already is, i.e. a reference cycle made no progress through the
    /// instance.
    pub(crate) fn enter_subroutine(&mut self, id: SubroutineId, instance: &Value) -> bool {
        self.active.insert((id, ptr::from_ref(instance) as usize))
    }

    pub(crate) fn leave_subroutine(&mut self, id: SubroutineId, instance: &Value) {
        self.active.remove(&(id, ptr::from_ref(instance) as usize));
    }
}

/// A compiled schema.
///
/// Build one with [`crate::validator_for`] or [`crate::options`] and reuse it: compilation
/// happens once, every call only walks the compiled checks. A `Validator` is `Send + Sync`, each
/// call keeps its own error state.
pub struct Validator {
    root: SchemaNode,
    subroutines: Box<[OnceLock<SchemaNode>]>,
    schema: Value,
    verbose: bool,
    filter: bool,
    use_defaults: bool,
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("schema", &self.schema)
            .field("verbose", &self.verbose)
            .field("filter", &self.filter)
            .field("use_defaults", &self.use_defaults)
            .finish_non_exhaustive()
    }
}

impl Validator {
    pub(crate) fn new(
        root: SchemaNode,
        subroutines: Box<[OnceLock<SchemaNode>]>,
        schema: Value,
        config: &ValidationOptions,
    ) -> Validator {
        Validator {
            root,
            subroutines,
            schema,
            verbose: config.verbose,
            filter: config.filter,
            use_defaults: config.use_defaults,
        }
    }

    /// Create a default [`ValidationOptions`] for configuring a validator.
    #[must_use]
    pub fn options() -> ValidationOptions {
        ValidationOptions::default()
    }

    /// Run validation against `instance` and collect every violation, in the order the checks
    /// ran.
    ///
    /// Never modifies `instance`, `should_filter` and `should_use_defaults` only affect
    /// [`Validator::validate_mut`].
    ///
    /// # Errors
    ///
    /// Returns all violations if `instance` does not match the schema.
    pub fn validate(&self, instance: &Value) -> Result<(), ValidationErrors> {
        let mut ctx = ValidationContext::new(
            ErrorAccumulator::recording(self.verbose),
            &self.subroutines,
        );
        self.root.validate(instance, &LazyLocation::new(), &mut ctx);
        finish(ctx)
    }

    /// Run validation against `instance`, modifying it as configured.
    ///
    /// With `should_filter(true)`, properties rejected by `additionalProperties: false` are
    /// removed instead of reported. With `should_filter(true)` or `should_use_defaults(true)`,
    /// absent fields with a `default` receive a copy of it.
    ///
    /// # Errors
    ///
    /// Returns all remaining violations if `instance` does not match the schema.
    pub fn validate_mut(&self, instance: &mut Value) -> Result<(), ValidationErrors> {
        let mut ctx = ValidationContext::new(
            ErrorAccumulator::recording(self.verbose),
            &self.subroutines,
        );
        ctx.filter = self.filter;
        ctx.use_defaults = self.use_defaults;
        self.root.apply(instance, &LazyLocation::new(), &mut ctx);
        finish(ctx)
    }

    /// Check whether `instance` matches the schema. No violations are recorded.
    #[must_use]
    pub fn is_valid(&self, instance: &Value) -> bool {
        let mut ctx = ValidationContext::new(ErrorAccumulator::counting(), &self.subroutines);
        self.root.validate(instance, &LazyLocation::new(), &mut ctx);
        ctx.errors.count() == 0
    }

    /// The schema this validator was built from, unmodified.
    #[must_use]
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    #[cfg(test)]
    pub(crate) fn subroutine_count(&self) -> usize {
        self.subroutines.len()
    }
}

fn finish(ctx: ValidationContext<'_>) -> Result<(), ValidationErrors> {
    if ctx.errors.count() == 0 {
        Ok(())
    } else {
        Err(ValidationErrors::new(ctx.errors.into_violations()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    #[test]
    fn is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<super::Validator>();
    }

    #[test]
    fn runs_are_independent() {
        let validator = crate::validator_for(&json!({"type": "string"})).expect("Invalid schema");
        assert!(validator.validate(&json!(1)).is_err());
        assert!(validator.validate(&json!("ok")).is_ok());
        assert_eq!(
            validator.validate(&json!(1)).expect_err("Should fail").len(),
            1
        );
    }

    #[test]
    fn schema_is_unchanged() {
        let schema = json!({
            "required": true,
            "type": "object",
            "properties": {"hello": {"type": "string", "required": true}}
        });
        let validator = crate::validator_for(&schema).expect("Invalid schema");
        assert_eq!(validator.schema(), &schema);
    }

    #[test]
    fn validate_does_not_modify() {
        let validator = crate::options()
            .should_filter(true)
            .build(&json!({"additionalProperties": false, "properties": {"a": {"default": 1}}}))
            .expect("Invalid schema");
        assert!(validator.validate(&json!({"b": 2})).is_err());
        assert!(!validator.is_valid(&json!({"b": 2})));
    }
}
