//! Trait for converting errors into [`Exception`] causes.
//!
//! Validators that observe an underlying error (a failed parse, an unreadable
//! file) record it as the cause of their failure. This trait is the seam that
//! turns those errors into exceptions, preserving their `source()` chain.
//!
//! # Implementations
//!
//! - `Exception` and `Arc<Exception>` - identity
//! - `std::io::Error` - [`ExceptionKind::Io`] (checked)
//! - `ParseIntError`, `ParseFloatError`, `ParseBoolError` - [`ExceptionKind::InvalidArgument`]
//! - `Box<dyn Error + Send + Sync>` - a checked custom kind named `Error`
//!
//! # Examples
//!
//! ```
//! use check_rail::{traits::IntoException, Category, ExceptionKind};
//!
//! let cause = "x1".parse::<u8>().unwrap_err().into_exception();
//! assert_eq!(cause.kind(), &ExceptionKind::InvalidArgument);
//!
//! let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into_exception();
//! assert_eq!(io.category(), Category::Checked);
//! ```
use std::error::Error;
use std::num::{ParseFloatError, ParseIntError};
use std::str::ParseBoolError;
use std::sync::Arc;

use crate::exception::{Category, Exception, ExceptionKind};

/// Converts a type into an [`Exception`].
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as the cause of a validation failure",
    label = "this type does not implement `IntoException`",
    note = "implement `IntoException` manually or convert the error with `Exception::from_error`"
)]
pub trait IntoException {
    fn into_exception(self) -> Exception;

    /// Converts and wraps the result in an [`Arc`], ready to be used as a cause.
    #[inline]
    fn into_cause(self) -> Arc<Exception>
    where
        Self: Sized,
    {
        Arc::new(self.into_exception())
    }
}

impl IntoException for Exception {
    #[inline]
    fn into_exception(self) -> Exception {
        self
    }

    #[inline]
    fn into_cause(self) -> Arc<Exception> {
        Arc::new(self)
    }
}

impl IntoException for Arc<Exception> {
    #[inline]
    fn into_exception(self) -> Exception {
        Arc::unwrap_or_clone(self)
    }

    #[inline]
    fn into_cause(self) -> Arc<Exception> {
        self
    }
}

impl IntoException for std::io::Error {
    fn into_exception(self) -> Exception {
        Exception::from_error(ExceptionKind::Io, &self)
    }
}

macro_rules! impl_invalid_argument {
    ($($type:ty),* $(,)?) => {
        $(
            impl IntoException for $type {
                fn into_exception(self) -> Exception {
                    Exception::from_error(ExceptionKind::InvalidArgument, &self)
                }
            }
        )*
    };
}

impl_invalid_argument!(ParseIntError, ParseFloatError, ParseBoolError);

impl IntoException for Box<dyn Error + Send + Sync> {
    fn into_exception(self) -> Exception {
        Exception::from_error(ExceptionKind::custom("Error", Category::Checked), &*self)
    }
}
