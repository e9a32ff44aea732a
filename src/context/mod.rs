//! Scoped diagnostic context.
//!
//! Validation code often knows something about *why* a value is being checked
//! (the request being served, the user involved, the file being parsed) that
//! the check itself does not. The context lets any caller overlay such
//! key/value pairs for the duration of a scope; failures recorded meanwhile
//! pick them up as diagnostic metadata.
//!
//! - [`ContextStore`]: the per-thread (or per-task, with the `async` feature)
//!   map, or an explicit store passed through calls.
//! - [`ScopedContext`]: a guard whose changes to the store are undone on close
//!   or drop.
//! - [`ContextValue`]: the type-erased values kept in the store.
//!
//! # Examples
//!
//! ```
//! use check_rail::{thread_context, ContextStore};
//!
//! fn import_row(row: usize) -> bool {
//!     let _scope = thread_context!("row" => row);
//!     ContextStore::current().contains("row")
//! }
//!
//! assert!(import_row(3));
//! assert!(!ContextStore::current().contains("row"));
//! ```

pub mod scoped;
pub mod store;
pub mod value;

pub use scoped::ScopedContext;
pub use store::ContextStore;
pub use value::ContextValue;

/// Renders context entries for attachment to a failure.
pub(crate) fn render_entries<'a, I>(entries: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (&'a String, &'a ContextValue)>,
{
    entries.into_iter().map(|(key, value)| (key.clone(), value.render())).collect()
}
