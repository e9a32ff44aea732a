use std::sync::Arc;

use crate::exception::Exception;
use crate::failure::ValidationFailure;

/// Every failure of a finished validation chain.
///
/// All recorded failures stay reachable through [`iter`](Self::iter) and
/// [`exceptions`](Self::exceptions). The combined [`exception`](Self::exception)
/// is the first failure's exception carrying every later one as suppressed.
///
/// # Examples
///
/// ```
/// use check_rail::{ExceptionKind, FailureAccumulator};
///
/// let mut failures = FailureAccumulator::default();
/// failures.append("host may not be empty", None, ExceptionKind::InvalidArgument.factory());
/// failures.append("port must be positive", None, ExceptionKind::OutOfBounds.factory());
///
/// let failures = failures.into_failures();
/// let exception = failures.exception().unwrap();
/// assert_eq!(exception.message(), "host may not be empty");
/// assert_eq!(exception.suppressed()[0].message(), "port must be positive");
/// assert!(failures.into_result().is_err());
/// ```
#[derive(Debug, Default)]
pub struct ValidationFailures {
    failures: Vec<ValidationFailure>,
}

impl ValidationFailures {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, ValidationFailure> {
        self.failures.iter()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.failures.iter().map(ValidationFailure::message).collect()
    }

    /// Materializes every failure, in order.
    pub fn exceptions(&self) -> Vec<Arc<Exception>> {
        self.failures.iter().map(ValidationFailure::exception).collect()
    }

    /// Returns the combined exception, or `None` if nothing failed.
    ///
    /// With a single failure this is that failure's exception itself.
    pub fn exception(&self) -> Option<Arc<Exception>> {
        let (first, rest) = self.failures.split_first()?;
        let primary = first.exception();
        if rest.is_empty() {
            return Some(primary);
        }
        let combined = rest
            .iter()
            .map(ValidationFailure::exception)
            .fold(Exception::clone(&primary), |combined, suppressed| {
                combined.with_suppressed(suppressed)
            });
        Some(Arc::new(combined))
    }

    /// Returns `Ok(())` if nothing failed, otherwise the combined exception.
    pub fn into_result(self) -> Result<(), Arc<Exception>> {
        match self.exception() {
            Some(exception) => Err(exception),
            None => Ok(()),
        }
    }
}

impl FromIterator<ValidationFailure> for ValidationFailures {
    fn from_iter<I: IntoIterator<Item = ValidationFailure>>(iter: I) -> Self {
        Self { failures: iter.into_iter().collect() }
    }
}

impl IntoIterator for ValidationFailures {
    type Item = ValidationFailure;
    type IntoIter = std::vec::IntoIter<ValidationFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationFailures {
    type Item = &'a ValidationFailure;
    type IntoIter = core::slice::Iter<'a, ValidationFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.iter()
    }
}
