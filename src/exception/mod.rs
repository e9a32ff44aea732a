//! The exception objects produced by materializing validation failures.
//!
//! An [`Exception`] is an ordinary Rust error value: it implements
//! [`std::error::Error`], walks its cause chain through `source()`, and is
//! cheap to share behind an [`Arc`]. What it adds over a plain error is a
//! [`Category`] fixed at construction, suppressed exceptions, diagnostic
//! context entries and a [`StackTrace`].
//!
//! # Examples
//!
//! ```
//! use check_rail::{Category, Exception, ExceptionKind};
//!
//! let io = Exception::new(ExceptionKind::Io, "config.toml is unreadable");
//! assert_eq!(io.category(), Category::Checked);
//!
//! let wrapped = Exception::wrap_unchecked(io.into());
//! assert!(wrapped.is_unchecked_compatible());
//! assert_eq!(wrapped.cause().unwrap().kind(), &ExceptionKind::Io);
//! ```

use std::fmt;
use std::sync::Arc;

pub mod kind;
pub mod stack_trace;

pub use kind::{Category, ExceptionKind};
pub use stack_trace::{StackFrame, StackTrace};

/// A materialized failure.
#[derive(Debug, Clone)]
pub struct Exception {
    kind: ExceptionKind,
    category: Category,
    message: String,
    cause: Option<Arc<Exception>>,
    suppressed: Vec<Arc<Exception>>,
    context: Vec<(String, String)>,
    stack_trace: StackTrace,
}

impl Exception {
    /// Creates an exception, recording the current stack per
    /// [`StackTrace::capture`].
    pub fn new(kind: ExceptionKind, message: impl Into<String>) -> Self {
        let category = kind.category();
        Self {
            kind,
            category,
            message: message.into(),
            cause: None,
            suppressed: Vec::new(),
            context: Vec::new(),
            stack_trace: StackTrace::capture(),
        }
    }

    /// Shorthand for `Exception::new(ExceptionKind::InvalidArgument, message)`.
    #[inline]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ExceptionKind::InvalidArgument, message)
    }

    /// Shorthand for `Exception::new(ExceptionKind::MissingValue, message)`.
    #[inline]
    pub fn missing_value(message: impl Into<String>) -> Self {
        Self::new(ExceptionKind::MissingValue, message)
    }

    /// Shorthand for `Exception::new(ExceptionKind::InvalidState, message)`.
    #[inline]
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::new(ExceptionKind::InvalidState, message)
    }

    /// Shorthand for `Exception::new(ExceptionKind::Assertion, message)`.
    #[inline]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::new(ExceptionKind::Assertion, message)
    }

    pub(crate) fn with_optional_cause(
        kind: ExceptionKind,
        message: &str,
        cause: Option<Arc<Exception>>,
    ) -> Self {
        let mut exception = Self::new(kind, message);
        exception.cause = cause;
        exception
    }

    /// Converts `error` into an exception of `kind`.
    ///
    /// Each error in the `source()` chain becomes a cause of the same kind,
    /// innermost last.
    pub fn from_error(kind: ExceptionKind, error: &(dyn std::error::Error + 'static)) -> Self {
        let cause = error.source().map(|source| Arc::new(Self::from_error(kind.clone(), source)));
        let exception = Self::new(kind, error.to_string());
        match cause {
            Some(cause) => exception.with_cause(cause),
            None => exception,
        }
    }

    /// Wraps a checked exception in an [`ExceptionKind::Unchecked`] carrier.
    ///
    /// The carrier repeats the message and stack trace of `checked` and keeps
    /// it as its cause.
    pub fn wrap_unchecked(checked: Arc<Exception>) -> Self {
        Self {
            kind: ExceptionKind::Unchecked,
            category: Category::Unchecked,
            message: checked.message.clone(),
            cause: None,
            suppressed: Vec::new(),
            context: checked.context.clone(),
            stack_trace: checked.stack_trace.clone(),
        }
        .with_cause(checked)
    }

    /// Sets the cause.
    #[inline]
    pub fn with_cause(mut self, cause: impl Into<Arc<Exception>>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Appends a suppressed exception.
    #[inline]
    pub fn with_suppressed(mut self, suppressed: impl Into<Arc<Exception>>) -> Self {
        self.suppressed.push(suppressed.into());
        self
    }

    /// Appends diagnostic context entries.
    pub fn with_context<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.context
            .extend(entries.into_iter().map(|(key, value)| (key.into(), value.into())));
        self
    }

    /// Replaces the recorded stack trace.
    #[inline]
    pub fn with_stack_trace(mut self, stack_trace: StackTrace) -> Self {
        self.stack_trace = stack_trace;
        self
    }

    #[inline]
    pub fn kind(&self) -> &ExceptionKind {
        &self.kind
    }

    #[inline]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Returns `true` unless the exception is [`Category::Checked`].
    #[inline]
    pub fn is_unchecked_compatible(&self) -> bool {
        self.category.is_unchecked_compatible()
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn cause(&self) -> Option<&Arc<Exception>> {
        self.cause.as_ref()
    }

    /// Iterates the cause chain, starting with the direct cause.
    pub fn causes(&self) -> impl Iterator<Item = &Exception> {
        core::iter::successors(self.cause.as_deref(), |exception| exception.cause.as_deref())
    }

    #[inline]
    pub fn suppressed(&self) -> &[Arc<Exception>] {
        &self.suppressed
    }

    /// Returns the diagnostic context entries in the order they were attached.
    #[inline]
    pub fn context(&self) -> &[(String, String)] {
        &self.context
    }

    #[inline]
    pub fn stack_trace(&self) -> &StackTrace {
        &self.stack_trace
    }

    /// Strips internal frames from this exception's stack trace.
    pub(crate) fn clean_stack_trace(&mut self) -> usize {
        self.stack_trace.strip_internal()
    }

    /// Rebuilds this exception with a different kind, keeping everything else.
    pub(crate) fn rekind(&self, kind: ExceptionKind) -> Self {
        let mut exception = self.clone();
        exception.category = kind.category();
        exception.kind = kind;
        exception
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        for (key, value) in &self.context {
            write!(f, "\n{key}: {value}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Exception {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause.as_deref().map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}
