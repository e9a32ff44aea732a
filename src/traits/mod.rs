//! Conversion traits used at the edges of the crate.
//!
//! - [`IntoException`]: turns standard library errors (and exceptions
//!   themselves) into the [`Exception`](crate::Exception) recorded as the
//!   cause of a failure.

pub mod into_exception;

pub use into_exception::IntoException;
