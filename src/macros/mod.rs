//! Shorthand for opening a populated [`ScopedContext`](crate::ScopedContext).
//!
//! - [`macro@crate::thread_context`] - opens a scope over the current thread's
//!   (or task's) store and puts each `key => value` pair into it.
//!
//! # Examples
//!
//! ```
//! use check_rail::{thread_context, Validators};
//!
//! let _scope = thread_context!("tenant" => "acme", "attempt" => 2_u32);
//!
//! let failures = Validators::default().require_that("", "username")
//!     .satisfies(|name| !name.is_empty(), "\"username\" may not be empty")
//!     .into_failures();
//!
//! let exception = failures.exception().unwrap();
//! assert!(exception.context().contains(&("tenant".to_owned(), "\"acme\"".to_owned())));
//! assert!(exception.context().contains(&("attempt".to_owned(), "2".to_owned())));
//! ```

/// Opens a [`ScopedContext`](crate::ScopedContext) over
/// [`ContextStore::current`](crate::ContextStore::current) and puts every
/// `key => value` pair into it, in order.
///
/// The macro evaluates to the scope, which must be bound for the entries to
/// stay visible: binding it to `_` drops it, and the entries with it,
/// immediately.
///
/// # Examples
///
/// ```
/// use check_rail::{thread_context, ContextStore};
///
/// {
///     let _scope = thread_context!("job" => "reindex");
///     assert!(ContextStore::current().contains("job"));
/// }
/// assert!(!ContextStore::current().contains("job"));
///
/// let empty = thread_context!();
/// assert_eq!(empty.touched_keys().count(), 0);
/// ```
#[macro_export]
macro_rules! thread_context {
    ($($key:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut scope = $crate::ScopedContext::current();
        $(
            scope.put($key, $value);
        )*
        scope
    }};
}
