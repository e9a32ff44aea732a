//! Entry points for validating values.
//!
//! [`Validators`] holds a [`Configuration`] and factory-level context and
//! hands out one [`Validator`] per checked value. A validator records every
//! failed check in its [`FailureAccumulator`](crate::FailureAccumulator);
//! nothing is thrown until the caller asks for the result.
//!
//! # Examples
//!
//! ```
//! use check_rail::Validators;
//!
//! let validators = Validators::default().with_context("form", "signup");
//!
//! let age = validators.require_that(-3, "age").is_between(0, 150);
//! let failures = age.into_failures();
//!
//! assert_eq!(failures.len(), 1);
//! let exception = failures.exception().unwrap();
//! assert!(exception.message().starts_with("\"age\" must be between 0 (inclusive) and 150"));
//! assert!(exception.context().iter().any(|(key, _)| key == "form"));
//! ```

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

use crate::config::Configuration;
use crate::context::{ContextStore, ContextValue};
use crate::failure::ContractViolation;

pub mod core;

pub use self::core::Validator;

pub(crate) type ContextMap = BTreeMap<String, ContextValue>;

/// Creates validators that share a configuration and diagnostic context.
#[derive(Debug, Clone, Default)]
pub struct Validators {
    configuration: Configuration,
    context: ContextMap,
}

impl Validators {
    #[inline]
    pub fn new(configuration: Configuration) -> Self {
        Self { configuration, context: ContextMap::new() }
    }

    #[inline]
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Replaces the configuration with `f(current)`.
    ///
    /// Validators created earlier keep the configuration they were created
    /// with.
    pub fn update_configuration<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(Configuration) -> Configuration,
    {
        let current = std::mem::take(&mut self.configuration);
        self.configuration = f(current);
        self
    }

    /// Adds a context entry to every failure recorded by validators created
    /// from now on. Overrides an entry of the same key in the scoped context.
    pub fn with_context<V>(mut self, key: impl Into<String>, value: V) -> Self
    where
        V: Any + fmt::Debug + Send + Sync,
    {
        self.context.insert(key.into(), ContextValue::new(value));
        self
    }

    /// The context a failure recorded right now would see before any
    /// validator-level entries: the current scoped context overlaid with this
    /// factory's entries, sorted by key.
    pub fn context(&self) -> Vec<(String, ContextValue)> {
        let mut merged: ContextMap = ContextStore::current().snapshot().into_iter().collect();
        merged.extend(self.context.iter().map(|(key, value)| (key.clone(), value.clone())));
        merged.into_iter().collect()
    }

    /// Starts validating `value`.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty or contains whitespace. Use
    /// [`try_require_that`](Self::try_require_that) to receive the
    /// [`ContractViolation`] instead.
    #[track_caller]
    pub fn require_that<T>(&self, value: T, name: impl Into<String>) -> Validator<T> {
        match self.try_require_that(value, name) {
            Ok(validator) => validator,
            Err(violation) => panic!("{violation}"),
        }
    }

    /// Starts validating `value`.
    ///
    /// # Errors
    ///
    /// Returns [`ContractViolation::InvalidName`] if `name` is empty or
    /// contains whitespace.
    pub fn try_require_that<T>(
        &self,
        value: T,
        name: impl Into<String>,
    ) -> Result<Validator<T>, ContractViolation> {
        let name = checked_name(name.into())?;
        Ok(Validator::new(self.configuration.clone(), self.context.clone(), value, name))
    }

    /// Like [`require_that`](Self::require_that), but every materialized
    /// exception is converted into a fatal assertion failure. A transformer
    /// already set on this factory's configuration runs before the
    /// conversion.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty or contains whitespace.
    #[track_caller]
    pub fn assume_that<T>(&self, value: T, name: impl Into<String>) -> Validator<T> {
        let name = match checked_name(name.into()) {
            Ok(name) => name,
            Err(violation) => panic!("{violation}"),
        };
        let configuration = self.configuration.clone().with_assertion_transformer();
        Validator::new(configuration, self.context.clone(), value, name)
    }
}

/// Rejects names that are empty or contain whitespace.
pub(crate) fn checked_name(name: String) -> Result<String, ContractViolation> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(ContractViolation::InvalidName { name });
    }
    Ok(name)
}
