//! Deferred failure recording.
//!
//! - [`ValidationFailure`]: one violated check, materialized into an
//!   [`Exception`](crate::Exception) only when asked.
//! - [`FailureAccumulator`]: the ordered failures of one validation chain.
//! - [`ValidationFailures`]: the finished, multi-failure view.
//! - [`ContractViolation`]: misuse of the API, reported immediately.

pub mod accumulator;
pub mod failures;
pub mod record;
pub mod violation;

pub use accumulator::FailureAccumulator;
pub use failures::ValidationFailures;
pub use record::{ExceptionFactory, MaterializationState, ValidationFailure};
pub use violation::ContractViolation;
