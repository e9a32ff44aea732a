use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::{checked_name, ContextMap};
use crate::config::Configuration;
use crate::context::{render_entries, ContextStore, ContextValue};
use crate::exception::{Exception, ExceptionKind};
use crate::failure::{FailureAccumulator, ValidationFailures};

/// Validates a single named value, recording every failed check.
///
/// Checks consume and return the validator so they chain. After the first
/// failure later checks no longer evaluate their condition: each records a
/// generic [`ExceptionKind::InvalidState`] failure instead, since the value
/// they would inspect is already known to be invalid.
///
/// A validator derived through [`map`](Self::map) from a chain that had
/// already failed holds no value at all: the derivation is skipped, because
/// it could rely on the checks that failed.
///
/// Failures carry the diagnostic context in effect when they are recorded.
/// Entries set on the validator override the factory's entries, which
/// override the scoped context.
///
/// # Examples
///
/// ```
/// use check_rail::Validators;
///
/// let port = Validators::default()
///     .require_that(8080_u16, "port")
///     .is_not_equal_to(&0)
///     .is_between(1024, 49152);
///
/// assert!(!port.validation_failed());
/// assert_eq!(port.or_throw().unwrap(), 8080);
/// ```
#[must_use]
pub struct Validator<T> {
    name: String,
    /// `None` only after `map` on a failed chain.
    value: Option<T>,
    factory_context: ContextMap,
    context: ContextMap,
    failures: FailureAccumulator,
}

impl<T> Validator<T> {
    pub(crate) fn new(
        configuration: Configuration,
        factory_context: ContextMap,
        value: T,
        name: String,
    ) -> Self {
        Self {
            name,
            value: Some(value),
            factory_context,
            context: ContextMap::new(),
            failures: FailureAccumulator::new(configuration),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value, or `None` once any check has failed.
    #[inline]
    pub fn value(&self) -> Option<&T> {
        if self.validation_failed() {
            None
        } else {
            self.value.as_ref()
        }
    }

    /// Returns the value, or `default` once any check has failed.
    #[inline]
    pub fn value_or(self, default: T) -> T {
        match self.value {
            Some(value) if !self.failures.has_failed() => value,
            _ => default,
        }
    }

    #[inline]
    pub fn validation_failed(&self) -> bool {
        self.failures.has_failed()
    }

    /// Adds a context entry to failures recorded by this validator from now on.
    pub fn with_context<V>(mut self, key: impl Into<String>, value: V) -> Self
    where
        V: Any + fmt::Debug + Send + Sync,
    {
        self.context.insert(key.into(), ContextValue::new(value));
        self
    }

    /// Fails with `message` unless `predicate` holds for the value.
    pub fn satisfies<P>(self, predicate: P, message: impl Into<String>) -> Self
    where
        P: FnOnce(&T) -> bool,
    {
        self.check(predicate, ExceptionKind::InvalidArgument, |_, _| (message.into(), Vec::new()))
    }

    /// Fails unless the value equals `expected`.
    pub fn is_equal_to(self, expected: &T) -> Self
    where
        T: PartialEq + fmt::Debug,
    {
        self.check(
            |value| value == expected,
            ExceptionKind::InvalidArgument,
            |name, actual| {
                (
                    format!("\"{name}\" must be equal to {expected:?}."),
                    vec![("actual".to_owned(), format!("{actual:?}"))],
                )
            },
        )
    }

    /// Fails if the value equals `unwanted`.
    pub fn is_not_equal_to(self, unwanted: &T) -> Self
    where
        T: PartialEq + fmt::Debug,
    {
        self.check(
            |value| value != unwanted,
            ExceptionKind::InvalidArgument,
            |name, _| (format!("\"{name}\" may not be equal to {unwanted:?}."), Vec::new()),
        )
    }

    /// Fails unless `min <= value < max`.
    pub fn is_between(self, min: T, max: T) -> Self
    where
        T: PartialOrd + fmt::Debug,
    {
        self.check(
            |value| *value >= min && *value < max,
            ExceptionKind::OutOfBounds,
            |name, actual| {
                (
                    format!("\"{name}\" must be between {min:?} (inclusive) and {max:?} (exclusive)."),
                    vec![("actual".to_owned(), format!("{actual:?}"))],
                )
            },
        )
    }

    /// Applies a group of checks, typically a reusable helper.
    #[inline]
    pub fn and<F>(self, checks: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        checks(self)
    }

    /// Continues the chain on a value derived from this one.
    ///
    /// The derived validator shares this validator's failures and context, so
    /// its failures are appended after the ones already recorded. If this
    /// chain has already failed, `f` is not called and the derived validator
    /// has no value.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty or contains whitespace.
    #[track_caller]
    pub fn map<U, F>(self, name: impl Into<String>, f: F) -> Validator<U>
    where
        F: FnOnce(&T) -> U,
    {
        let name = match checked_name(name.into()) {
            Ok(name) => name,
            Err(violation) => panic!("{violation}"),
        };
        let value = if self.failures.has_failed() { None } else { self.value.as_ref().map(f) };
        Validator {
            value,
            name,
            factory_context: self.factory_context,
            context: self.context,
            failures: self.failures,
        }
    }

    /// The failures recorded so far.
    #[inline]
    pub fn failures(&self) -> &FailureAccumulator {
        &self.failures
    }

    #[inline]
    pub fn into_failures(self) -> ValidationFailures {
        self.failures.into_failures()
    }

    /// Returns the value if every check passed.
    ///
    /// # Errors
    ///
    /// Returns the combined exception of all recorded failures: the first
    /// failure's exception with the later ones attached as suppressed.
    pub fn or_throw(self) -> Result<T, Arc<Exception>> {
        let Self { name, value, failures, .. } = self;
        match failures.into_failures().exception() {
            Some(exception) => Err(exception),
            None => value.ok_or_else(|| {
                Arc::new(Exception::invalid_state(format!("\"{name}\" has no value.")))
            }),
        }
    }

    /// Evaluates one check and records a failure if it does not hold.
    fn check<P, D>(mut self, predicate: P, kind: ExceptionKind, describe: D) -> Self
    where
        P: FnOnce(&T) -> bool,
        D: FnOnce(&str, &T) -> (String, Vec<(String, String)>),
    {
        let failed = match &self.value {
            Some(value) if !self.failures.has_failed() => {
                (!predicate(value)).then(|| (kind, describe(&self.name, value)))
            }
            _ => {
                let message = format!(
                    "\"{}\" could not be validated because an earlier check failed.",
                    self.name
                );
                Some((ExceptionKind::InvalidState, (message, Vec::new())))
            }
        };
        if let Some((kind, (message, entries))) = failed {
            self.record(kind, message, entries);
        }
        self
    }

    fn record(&mut self, kind: ExceptionKind, message: String, entries: Vec<(String, String)>) {
        let mut context = self.failure_context();
        context.extend(entries);
        self.failures.append_in_context(context, message, None, kind.factory());
    }

    /// Merges the scoped, factory and validator context, later layers winning.
    fn failure_context(&self) -> Vec<(String, String)> {
        let mut merged: ContextMap = ContextStore::current().snapshot().into_iter().collect();
        for layer in [&self.factory_context, &self.context] {
            merged.extend(layer.iter().map(|(key, value)| (key.clone(), value.clone())));
        }
        render_entries(&merged)
    }
}

impl<T: fmt::Debug> fmt::Debug for Validator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("failures", &self.failures.len())
            .finish()
    }
}
