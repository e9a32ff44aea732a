//! # check-rail
//!
//! Lazy failure accumulation and exception materialization for validation
//! code, plus a scoped diagnostic context.
//!
//! Validation checks record *failures* rather than returning early. A failure
//! keeps its message, cause and context, and a factory that knows how to build
//! the corresponding [`Exception`]. Building is deferred until somebody asks
//! for the exception, so a chain that fails many checks but only reports the
//! first pays for one stack capture instead of many.
//!
//! ## Modules
//!
//! - [`failure`]: [`ValidationFailure`] records, the ordered
//!   [`FailureAccumulator`] and the [`ValidationFailures`] view
//! - [`exception`]: the [`Exception`] type with its [`Category`] and [`StackTrace`]
//! - [`config`]: [`Configuration`] for laziness, stack cleaning and transformation
//! - [`context`]: the thread- or task-local [`ContextStore`] and [`ScopedContext`] guards
//! - [`validator`]: [`Validators`] and [`Validator`], a small checking front end
//!
//! ## Feature Flags
//!
//! - `tracing` *(default)*: emit `tracing` events under the `check_rail` target
//! - `serde`: serialize [`Category`], [`StackFrame`] and [`StackTrace`]
//! - `async`: task-local context stores via tokio
//! - `full`: all of the above
//!
//! # Examples
//!
//! ## Accumulating Failures
//!
//! ```
//! use check_rail::Validators;
//!
//! let validators = Validators::default();
//! let result = validators
//!     .require_that("ab", "code")
//!     .satisfies(|code| code.len() == 3, "\"code\" must be three characters long")
//!     .is_equal_to(&"abc")
//!     .or_throw();
//!
//! let exception = result.unwrap_err();
//! assert_eq!(exception.message(), "\"code\" must be three characters long");
//! assert_eq!(exception.suppressed().len(), 1);
//! ```
//!
//! ## Working With the Accumulator Directly
//!
//! ```
//! use check_rail::{Configuration, ExceptionKind, FailureAccumulator, MaterializationState};
//!
//! let mut failures = FailureAccumulator::new(Configuration::default());
//! failures.append("quota exceeded", None, ExceptionKind::InvalidState.factory());
//!
//! let record = failures.first().unwrap();
//! assert_eq!(record.state(), MaterializationState::Unbuilt);
//! let exception = record.exception();
//! assert_eq!(record.state(), MaterializationState::Finalized);
//! assert!(std::sync::Arc::ptr_eq(&exception, &record.exception()));
//! ```

#[macro_use]
mod log;

/// Exception configuration and presets
pub mod config;
/// Thread- and task-local diagnostic context
pub mod context;
/// Materialized exceptions, categories and stack traces
pub mod exception;
/// Failure records and their accumulation
pub mod failure;
/// Context macros
pub mod macros;
/// Convenience re-exports
pub mod prelude;
/// Conversion traits
pub mod traits;
/// Validation front end
pub mod validator;

use smallvec::SmallVec;

/// Inline storage for failure records; most chains record at most one failure.
pub type ErrorVec<E> = SmallVec<[E; 1]>;

pub use config::{Configuration, ExceptionTransformer};
pub use context::{ContextStore, ContextValue, ScopedContext};
pub use exception::{Category, Exception, ExceptionKind, StackFrame, StackTrace};
pub use failure::{
    ContractViolation, ExceptionFactory, FailureAccumulator, MaterializationState,
    ValidationFailure, ValidationFailures,
};
pub use traits::IntoException;
pub use validator::{Validator, Validators};
