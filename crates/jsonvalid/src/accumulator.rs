//! Counting and recording of violations during one validation run.
use serde_json::Value;

use crate::{
    error::{Violation, ViolationKind},
    paths::{LazyLocation, Location},
};

/// What a violation reports as its `value` in verbose mode.
#[derive(Clone, Copy)]
pub(crate) enum Offending<'a> {
    /// The checked value does not exist.
    Missing,
    Value(&'a Value),
    /// The rendered path of a rejected key.
    Path(&'a LazyLocation<'a>),
}

/// A point the accumulator can be rewound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Mark {
    count: usize,
    len: usize,
}

/// Running violation counter with an optional ordered record of violations.
///
/// Counting is always on. Recording only happens when the accumulator was created with
/// [`ErrorAccumulator::recording`] and is not suspended.
#[derive(Debug)]
pub(crate) struct ErrorAccumulator {
    count: usize,
    violations: Vec<Violation>,
    recording: bool,
    verbose: bool,
    suspended: usize,
}

impl ErrorAccumulator {
    pub(crate) fn counting() -> Self {
        ErrorAccumulator {
            count: 0,
            violations: Vec::new(),
            recording: false,
            verbose: false,
            suspended: 0,
        }
    }

    pub(crate) fn recording(verbose: bool) -> Self {
        ErrorAccumulator {
            recording: true,
            verbose,
            ..ErrorAccumulator::counting()
        }
    }

    #[inline]
    pub(crate) fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub(crate) fn mark(&self) -> Mark {
        Mark {
            count: self.count,
            len: self.violations.len(),
        }
    }

    /// Drop everything counted or recorded after `mark`.
    #[inline]
    pub(crate) fn rewind(&mut self, mark: Mark) {
        self.count = mark.count;
        self.violations.truncate(mark.len);
    }

    /// Whether anything was counted since `mark`.
    #[inline]
    pub(crate) fn grew_since(&self, mark: Mark) -> bool {
        self.count != mark.count
    }

    /// Stop recording (counting continues) until the matching [`ErrorAccumulator::resume`].
    #[inline]
    pub(crate) fn suspend(&mut self) {
        self.suspended += 1;
    }

    #[inline]
    pub(crate) fn resume(&mut self) {
        self.suspended = self.suspended.saturating_sub(1);
    }

    #[inline]
    fn is_recording(&self) -> bool {
        self.recording && self.suspended == 0
    }

    pub(crate) fn report(
        &mut self,
        field: &LazyLocation,
        kind: ViolationKind,
        offending: Offending<'_>,
        expected_type: Option<&Value>,
        schema_path: &Location,
    ) {
        self.count += 1;
        if !self.is_recording() {
            return;
        }
        let violation = if self.verbose {
            Violation {
                field: field.render(),
                kind,
                value: match offending {
                    Offending::Missing => None,
                    Offending::Value(value) => Some(value.clone()),
                    Offending::Path(path) => Some(Value::String(path.render())),
                },
                expected_type: expected_type.cloned(),
                schema_path: Some(schema_path.clone()),
            }
        } else {
            Violation {
                field: field.render(),
                kind,
                value: None,
                expected_type: None,
                schema_path: None,
            }
        };
        self.violations.push(violation);
    }

    pub(crate) fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}
