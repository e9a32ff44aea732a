//! A single recorded failure and the pipeline that turns it into an exception.
//!
//! Materialization walks a three-state cell:
//!
//! ```text
//! Unbuilt(factory) --raw_exception()--> RawBuilt(raw) --exception()--> Finalized(raw, final)
//! ```
//!
//! The factory is an `FnOnce`, so it cannot be invoked twice. Finalization
//! applies the configured transformer, wraps checked exceptions in an
//! unchecked carrier and strips internal stack frames, all exactly once.
//!
//! A panicking factory leaves the record `Poisoned`: the panic propagates to
//! the caller and every later access reports it. A panicking transformer
//! leaves the record `RawBuilt`.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::sync::Arc;

use crate::config::Configuration;
use crate::exception::Exception;
use crate::failure::ContractViolation;

/// Produces the exception for a failure from its message and optional cause.
pub type ExceptionFactory = Box<dyn FnOnce(&str, Option<Arc<Exception>>) -> Exception + Send>;

/// Where a [`ValidationFailure`] is in its materialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterializationState {
    /// The factory has not run.
    Unbuilt,
    /// The factory has run; transformation and wrapping are pending.
    RawBuilt,
    /// The public exception is available.
    Finalized,
    /// The factory panicked; the exception can never be built.
    Poisoned,
}

enum Materialization {
    Unbuilt(ExceptionFactory),
    RawBuilt(Arc<Exception>),
    Finalized { raw: Arc<Exception>, exception: Arc<Exception> },
    /// The factory is running.
    InFlight,
    /// The factory unwound instead of returning.
    Poisoned,
}

/// One violated check.
///
/// Records are confined to the thread that owns their validation chain: they
/// are `Send` but not `Sync`.
pub struct ValidationFailure {
    message: String,
    cause: Option<Arc<Exception>>,
    context: Vec<(String, String)>,
    configuration: Configuration,
    state: RefCell<Materialization>,
    finalizing: Cell<bool>,
}

impl ValidationFailure {
    /// Records a failure.
    ///
    /// When `configuration` disables lazy exceptions the factory runs before
    /// this returns.
    ///
    /// # Errors
    ///
    /// Returns [`ContractViolation::BlankMessage`] if `message` is empty or
    /// all whitespace; the factory is not invoked.
    pub fn new<F>(
        configuration: Configuration,
        message: impl Into<String>,
        cause: Option<Arc<Exception>>,
        context: Vec<(String, String)>,
        factory: F,
    ) -> Result<Self, ContractViolation>
    where
        F: FnOnce(&str, Option<Arc<Exception>>) -> Exception + Send + 'static,
    {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ContractViolation::BlankMessage);
        }
        let failure = Self {
            message,
            cause,
            context,
            configuration,
            state: RefCell::new(Materialization::Unbuilt(Box::new(factory))),
            finalizing: Cell::new(false),
        };
        if !failure.configuration.lazy_exceptions() {
            failure.raw_exception();
        }
        Ok(failure)
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn cause(&self) -> Option<&Arc<Exception>> {
        self.cause.as_ref()
    }

    /// Diagnostic context captured when the failure was recorded.
    #[inline]
    pub fn context(&self) -> &[(String, String)] {
        &self.context
    }

    #[inline]
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn state(&self) -> MaterializationState {
        match &*self.state.borrow() {
            Materialization::Unbuilt(_) | Materialization::InFlight => MaterializationState::Unbuilt,
            Materialization::RawBuilt(_) => MaterializationState::RawBuilt,
            Materialization::Finalized { .. } => MaterializationState::Finalized,
            Materialization::Poisoned => MaterializationState::Poisoned,
        }
    }

    /// Returns the factory's exception, invoking the factory on first access.
    ///
    /// # Panics
    ///
    /// Panics if called from inside this failure's own factory, or if the
    /// factory panicked on an earlier call.
    pub fn raw_exception(&self) -> Arc<Exception> {
        let factory = {
            let mut state = self.state.borrow_mut();
            match &*state {
                Materialization::RawBuilt(raw) | Materialization::Finalized { raw, .. } => {
                    return Arc::clone(raw);
                }
                Materialization::InFlight => reentrant(),
                Materialization::Poisoned => poisoned(),
                Materialization::Unbuilt(_) => {}
            }
            match std::mem::replace(&mut *state, Materialization::InFlight) {
                Materialization::Unbuilt(factory) => factory,
                _ => unreachable!("state was checked above"),
            }
        };

        let _poison = PoisonOnUnwind(&self.state);
        let mut raw = factory(&self.message, self.cause.clone());
        if !self.context.is_empty() {
            raw = raw.with_context(self.context.iter().cloned());
        }
        rail_event!(debug, failure = %self.message, kind = %raw.kind(), "exception built");

        let raw = Arc::new(raw);
        *self.state.borrow_mut() = Materialization::RawBuilt(Arc::clone(&raw));
        raw
    }

    /// Returns the public exception for this failure.
    ///
    /// The first call runs the factory if needed, applies the configured
    /// transformer, wraps a checked result in an unchecked carrier and, if
    /// enabled, strips internal stack frames. Later calls return the same
    /// `Arc`.
    ///
    /// # Panics
    ///
    /// Panics if called from inside this failure's own factory or transformer,
    /// or if the factory panicked on an earlier call. A transformer that
    /// panics leaves the raw exception in place, so a later call retries it.
    pub fn exception(&self) -> Arc<Exception> {
        if let Materialization::Finalized { exception, .. } = &*self.state.borrow() {
            return Arc::clone(exception);
        }
        if self.finalizing.replace(true) {
            reentrant();
        }
        let _finalizing = ClearOnDrop(&self.finalizing);

        let raw = self.raw_exception();
        let exception = self.finalize(&raw);
        *self.state.borrow_mut() =
            Materialization::Finalized { raw, exception: Arc::clone(&exception) };
        exception
    }

    fn finalize(&self, raw: &Arc<Exception>) -> Arc<Exception> {
        let candidate = match self.configuration.transform(raw) {
            Some(transformed) => Arc::new(transformed),
            None => Arc::clone(raw),
        };
        let mut exception = if candidate.is_unchecked_compatible() {
            candidate
        } else {
            Arc::new(Exception::wrap_unchecked(candidate))
        };

        if self.configuration.clean_stack_trace() && !exception.stack_trace().is_empty() {
            #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
            let removed = Arc::make_mut(&mut exception).clean_stack_trace();
            rail_event!(trace, removed, "cleaned stack trace");
        }
        exception
    }
}

#[cold]
fn reentrant() -> ! {
    panic!("a validation failure may not be materialized from its own factory or transformer")
}

#[cold]
fn poisoned() -> ! {
    panic!("the exception factory of this validation failure panicked on an earlier call")
}

/// Moves a record whose factory unwinds from `InFlight` to `Poisoned`.
struct PoisonOnUnwind<'a>(&'a RefCell<Materialization>);

impl Drop for PoisonOnUnwind<'_> {
    fn drop(&mut self) {
        if let Ok(mut state) = self.0.try_borrow_mut() {
            if matches!(*state, Materialization::InFlight) {
                *state = Materialization::Poisoned;
            }
        }
    }
}

/// Resets the finalizing flag however `exception()` exits.
struct ClearOnDrop<'a>(&'a Cell<bool>);

impl Drop for ClearOnDrop<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl fmt::Debug for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationFailure")
            .field("message", &self.message)
            .field("cause", &self.cause)
            .field("context", &self.context)
            .field("state", &self.state())
            .finish()
    }
}
