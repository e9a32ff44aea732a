//! Exception kinds and their fixed category.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::Exception;

/// How callers are expected to treat an exception.
///
/// The category is decided once, when the exception is constructed, and never
/// inspected after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Category {
    /// A recoverable failure that callers are not forced to declare.
    Unchecked,
    /// A failure that must be declared by the code that surfaces it.
    ///
    /// Exceptions in this category are never observable from the
    /// materialization pipeline; they are wrapped in an
    /// [`ExceptionKind::Unchecked`] carrier first.
    Checked,
    /// A failure that indicates a broken program invariant.
    Fatal,
}

impl Category {
    /// Returns `true` for [`Category::Unchecked`] and [`Category::Fatal`].
    #[inline]
    pub fn is_unchecked_compatible(self) -> bool {
        !matches!(self, Self::Checked)
    }
}

/// The type of an [`Exception`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExceptionKind {
    /// A value did not satisfy a requirement.
    InvalidArgument,
    /// A required value was absent.
    MissingValue,
    /// The state of a value or of the validation chain prevents the operation.
    InvalidState,
    /// An index or size fell outside of its permitted range.
    OutOfBounds,
    /// An I/O operation failed. Checked.
    Io,
    /// An assertion failed. Fatal.
    Assertion,
    /// Unchecked carrier wrapping a checked exception, kept as the cause.
    Unchecked,
    /// A caller-defined kind.
    Custom {
        /// Name shown when the exception is displayed.
        name: Cow<'static, str>,
        /// Category of every exception of this kind.
        category: Category,
    },
}

impl ExceptionKind {
    /// Creates a caller-defined kind.
    #[inline]
    pub fn custom(name: impl Into<Cow<'static, str>>, category: Category) -> Self {
        Self::Custom { name: name.into(), category }
    }

    /// Returns the display name of this kind.
    pub fn name(&self) -> &str {
        match self {
            Self::InvalidArgument => "InvalidArgument",
            Self::MissingValue => "MissingValue",
            Self::InvalidState => "InvalidState",
            Self::OutOfBounds => "OutOfBounds",
            Self::Io => "Io",
            Self::Assertion => "Assertion",
            Self::Unchecked => "Unchecked",
            Self::Custom { name, .. } => name,
        }
    }

    /// Returns the category shared by every exception of this kind.
    pub fn category(&self) -> Category {
        match self {
            Self::InvalidArgument
            | Self::MissingValue
            | Self::InvalidState
            | Self::OutOfBounds
            | Self::Unchecked => Category::Unchecked,
            Self::Io => Category::Checked,
            Self::Assertion => Category::Fatal,
            Self::Custom { category, .. } => *category,
        }
    }

    /// Returns an exception factory that builds exceptions of this kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use check_rail::{ExceptionKind, FailureAccumulator};
    ///
    /// let mut failures = FailureAccumulator::default();
    /// failures.append("port must be positive", None, ExceptionKind::InvalidArgument.factory());
    ///
    /// let exception = failures.primary_exception().unwrap();
    /// assert_eq!(exception.kind(), &ExceptionKind::InvalidArgument);
    /// ```
    pub fn factory(self) -> impl FnOnce(&str, Option<Arc<Exception>>) -> Exception + Send + 'static {
        move |message, cause| Exception::with_optional_cause(self, message, cause)
    }
}

impl fmt::Display for ExceptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
