//! Tests for failure records, the accumulator and the multi-failure view.


use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use check_rail::{Exception, ExceptionKind};

/// A factory that counts its invocations.
pub fn counting_factory(
    counter: &Arc<AtomicUsize>,
    kind: ExceptionKind,
) -> impl FnOnce(&str, Option<Arc<Exception>>) -> Exception + Send + 'static {
    let counter = Arc::clone(counter);
    move |message, cause| {
        counter.fetch_add(1, Ordering::SeqCst);
        let exception = Exception::new(kind, message);
        match cause {
            Some(cause) => exception.with_cause(cause),
            None => exception,
        }
    }
}
