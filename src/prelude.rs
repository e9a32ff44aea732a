//! Convenience re-exports for common usage patterns.
//!
//! ```
//! use check_rail::prelude::*;
//!
//! let _scope = thread_context!("request" => 7_u64);
//! let failures = Validators::default().require_that(0, "count").is_between(1, 10).into_failures();
//! assert_eq!(failures.len(), 1);
//! ```

pub use crate::thread_context;
pub use crate::{
    Configuration, ContextStore, Exception, ExceptionKind, FailureAccumulator, IntoException,
    ScopedContext, ValidationFailures, Validator, Validators,
};
