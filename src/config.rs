//! Policy knobs consulted when failures are recorded and materialized.
//!
//! A [`Configuration`] is a small value type. Every `with_*` method returns a
//! modified copy, so a configuration handed to a validation chain can never
//! change underneath it; the transformer is shared through an [`Arc`].
//!
//! # Examples
//!
//! ```
//! use check_rail::{Configuration, Exception, ExceptionKind};
//!
//! let config = Configuration::default()
//!     .with_lazy_exceptions(false)
//!     .with_exception_transformer(|exception| {
//!         (exception.kind() == &ExceptionKind::MissingValue)
//!             .then(|| Exception::invalid_argument(exception.message()))
//!     });
//!
//! assert!(!config.lazy_exceptions());
//! assert!(config.clean_stack_trace());
//! assert!(config.exception_transformer().is_some());
//! ```

use std::fmt;
use std::sync::Arc;

use crate::exception::{Exception, ExceptionKind};

/// Rewrites a raw exception. Returning `None` keeps the raw exception.
pub type ExceptionTransformer = Arc<dyn Fn(&Arc<Exception>) -> Option<Exception> + Send + Sync>;

/// Global policy for one validation session.
#[derive(Clone)]
pub struct Configuration {
    lazy_exceptions: bool,
    clean_stack_trace: bool,
    exception_transformer: Option<ExceptionTransformer>,
}

impl Default for Configuration {
    /// Lazy exceptions, clean stack traces, no transformer.
    fn default() -> Self {
        Self { lazy_exceptions: true, clean_stack_trace: true, exception_transformer: None }
    }
}

impl Configuration {
    /// Builds exceptions as soon as a failure is recorded.
    #[inline]
    pub fn eager() -> Self {
        Self { lazy_exceptions: false, ..Default::default() }
    }

    /// Converts every materialized exception into a fatal
    /// [`ExceptionKind::Assertion`] that keeps the message, cause, suppressed
    /// exceptions and stack trace of the original.
    #[inline]
    pub fn assertions() -> Self {
        Self::default().with_assertion_transformer()
    }

    /// Returns a copy that converts every exception into an assertion, as
    /// [`Configuration::assertions`] does. An existing transformer still runs
    /// first and the conversion applies to its result.
    pub fn with_assertion_transformer(self) -> Self {
        let previous = self.exception_transformer.clone();
        self.with_exception_transformer(move |raw| {
            let converted = match previous.as_ref().and_then(|transformer| transformer(raw)) {
                Some(transformed) => transformed.rekind(ExceptionKind::Assertion),
                None => raw.rekind(ExceptionKind::Assertion),
            };
            Some(converted)
        })
    }

    /// `true` if exceptions are built on first access rather than when the
    /// failure is recorded.
    #[inline]
    pub fn lazy_exceptions(&self) -> bool {
        self.lazy_exceptions
    }

    /// `true` if frames of this crate are removed from materialized exceptions.
    #[inline]
    pub fn clean_stack_trace(&self) -> bool {
        self.clean_stack_trace
    }

    #[inline]
    pub fn exception_transformer(&self) -> Option<&ExceptionTransformer> {
        self.exception_transformer.as_ref()
    }

    #[inline]
    pub fn with_lazy_exceptions(mut self, lazy_exceptions: bool) -> Self {
        self.lazy_exceptions = lazy_exceptions;
        self
    }

    #[inline]
    pub fn with_clean_stack_trace(mut self, clean_stack_trace: bool) -> Self {
        self.clean_stack_trace = clean_stack_trace;
        self
    }

    /// Returns a copy using `transformer`.
    pub fn with_exception_transformer<F>(mut self, transformer: F) -> Self
    where
        F: Fn(&Arc<Exception>) -> Option<Exception> + Send + Sync + 'static,
    {
        self.exception_transformer = Some(Arc::new(transformer));
        self
    }

    /// Returns a copy without a transformer.
    #[inline]
    pub fn without_exception_transformer(mut self) -> Self {
        self.exception_transformer = None;
        self
    }

    /// Runs the transformer, if any, over `raw`.
    pub(crate) fn transform(&self, raw: &Arc<Exception>) -> Option<Exception> {
        self.exception_transformer.as_ref().and_then(|transformer| transformer(raw))
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("lazy_exceptions", &self.lazy_exceptions)
            .field("clean_stack_trace", &self.clean_stack_trace)
            .field("exception_transformer", &self.exception_transformer.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
