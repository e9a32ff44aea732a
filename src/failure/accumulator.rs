use std::sync::Arc;

use crate::config::Configuration;
use crate::exception::Exception;
use crate::failure::{ContractViolation, ValidationFailure, ValidationFailures};
use crate::ErrorVec;

/// The ordered failures recorded by one validation chain.
///
/// Insertion order is the order in which checks failed; the first record is
/// the one surfaced by [`primary_exception`](Self::primary_exception). The
/// accumulator never throws, logs above `debug`, or reads the scoped context:
/// callers pass any diagnostic context they want recorded.
///
/// # Examples
///
/// ```
/// use check_rail::{ExceptionKind, FailureAccumulator};
///
/// let mut failures = FailureAccumulator::default();
/// assert!(!failures.has_failed());
///
/// failures.append("name may not be empty", None, ExceptionKind::InvalidArgument.factory());
/// failures.append("age may not be negative", None, ExceptionKind::OutOfBounds.factory());
///
/// assert!(failures.has_failed());
/// assert_eq!(failures.messages(), ["name may not be empty", "age may not be negative"]);
/// assert_eq!(failures.primary_exception().unwrap().message(), "name may not be empty");
/// ```
#[derive(Debug, Default)]
pub struct FailureAccumulator {
    configuration: Configuration,
    records: ErrorVec<ValidationFailure>,
}

impl FailureAccumulator {
    /// Creates an empty accumulator that records failures under `configuration`.
    #[inline]
    pub fn new(configuration: Configuration) -> Self {
        Self { configuration, records: ErrorVec::new() }
    }

    #[inline]
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Records a failure without diagnostic context.
    ///
    /// # Panics
    ///
    /// Panics if `message` is blank. Use [`try_append`](Self::try_append) to
    /// receive the [`ContractViolation`] instead.
    pub fn append<F>(&mut self, message: impl Into<String>, cause: Option<Arc<Exception>>, factory: F)
    where
        F: FnOnce(&str, Option<Arc<Exception>>) -> Exception + Send + 'static,
    {
        self.append_in_context(Vec::new(), message, cause, factory);
    }

    /// Records a failure together with the diagnostic context that applied
    /// when it occurred.
    ///
    /// # Panics
    ///
    /// Panics if `message` is blank.
    pub fn append_in_context<F>(
        &mut self,
        context: Vec<(String, String)>,
        message: impl Into<String>,
        cause: Option<Arc<Exception>>,
        factory: F,
    ) where
        F: FnOnce(&str, Option<Arc<Exception>>) -> Exception + Send + 'static,
    {
        if let Err(violation) = self.try_append_in_context(context, message, cause, factory) {
            panic!("{violation}");
        }
    }

    /// Records a failure without diagnostic context.
    ///
    /// # Errors
    ///
    /// Returns [`ContractViolation::BlankMessage`] if `message` is blank; the
    /// accumulator is left unchanged.
    pub fn try_append<F>(
        &mut self,
        message: impl Into<String>,
        cause: Option<Arc<Exception>>,
        factory: F,
    ) -> Result<(), ContractViolation>
    where
        F: FnOnce(&str, Option<Arc<Exception>>) -> Exception + Send + 'static,
    {
        self.try_append_in_context(Vec::new(), message, cause, factory)
    }

    /// Records a failure with diagnostic context.
    ///
    /// # Errors
    ///
    /// Returns [`ContractViolation::BlankMessage`] if `message` is blank.
    pub fn try_append_in_context<F>(
        &mut self,
        context: Vec<(String, String)>,
        message: impl Into<String>,
        cause: Option<Arc<Exception>>,
        factory: F,
    ) -> Result<(), ContractViolation>
    where
        F: FnOnce(&str, Option<Arc<Exception>>) -> Exception + Send + 'static,
    {
        let failure =
            ValidationFailure::new(self.configuration.clone(), message, cause, context, factory)?;
        rail_event!(
            debug,
            failure = failure.message(),
            position = self.records.len(),
            "validation failure recorded"
        );
        self.records.push(failure);
        Ok(())
    }

    /// Returns `true` once any failure has been recorded.
    #[inline]
    pub fn has_failed(&self) -> bool {
        !self.records.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates the failures in the order they were recorded.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, ValidationFailure> {
        self.records.iter()
    }

    /// Returns the first failure, if any.
    #[inline]
    pub fn first(&self) -> Option<&ValidationFailure> {
        self.records.first()
    }

    /// Materializes and returns the exception of the first failure.
    ///
    /// Later failures are not materialized.
    #[inline]
    pub fn primary_exception(&self) -> Option<Arc<Exception>> {
        self.first().map(ValidationFailure::exception)
    }

    /// Returns the message of every failure, in order.
    pub fn messages(&self) -> Vec<&str> {
        self.records.iter().map(ValidationFailure::message).collect()
    }

    /// Converts the accumulator into the multi-failure view.
    #[inline]
    pub fn into_failures(self) -> ValidationFailures {
        self.records.into_iter().collect()
    }
}

impl IntoIterator for FailureAccumulator {
    type Item = ValidationFailure;
    type IntoIter = smallvec::IntoIter<[ValidationFailure; 1]>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a FailureAccumulator {
    type Item = &'a ValidationFailure;
    type IntoIter = core::slice::Iter<'a, ValidationFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
