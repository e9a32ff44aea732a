use std::collections::HashMap;
use std::fmt;

use super::{ContextStore, ContextValue};

/// What a key held immediately before a scope first touched it.
#[derive(Debug, Clone)]
enum Prior {
    Absent,
    Present(ContextValue),
}

impl Prior {
    fn from_value(value: Option<ContextValue>) -> Self {
        value.map_or(Self::Absent, Self::Present)
    }

    fn into_value(self) -> Option<ContextValue> {
        match self {
            Self::Absent => None,
            Self::Present(value) => Some(value),
        }
    }
}

/// A transactional overlay on a [`ContextStore`].
///
/// `put` and `remove` change the store immediately. The first time the scope
/// touches a key it remembers what that key held before; [`close`](Self::close)
/// puts every touched key back, deleting keys that were absent. Closing is
/// idempotent and also happens on drop, including while unwinding.
///
/// Scopes nest: an inner scope restores only the keys it touched, to the
/// values they had when it first touched them, which may be values written by
/// an outer scope that is still open.
///
/// # Examples
///
/// ```
/// use check_rail::{ContextStore, ScopedContext};
///
/// let store = ContextStore::new();
/// let mut outer = ScopedContext::open(store.clone());
/// outer.put("user", "alice");
/// {
///     let mut inner = store.scope();
///     inner.put("user", "bob");
///     assert_eq!(inner.get("user").unwrap().render(), "\"bob\"");
/// }
/// assert_eq!(store.get("user").unwrap().render(), "\"alice\"");
/// outer.close();
/// assert!(store.get("user").is_none());
/// ```
#[must_use = "the scope restores the context as soon as it is dropped"]
pub struct ScopedContext {
    store: ContextStore,
    prior_values: HashMap<String, Prior>,
}

impl ScopedContext {
    /// Opens a scope over `store`.
    #[inline]
    pub fn open(store: ContextStore) -> Self {
        rail_event!(trace, "context scope opened");
        Self { store, prior_values: HashMap::new() }
    }

    /// Opens a scope over [`ContextStore::current`].
    #[inline]
    pub fn current() -> Self {
        Self::open(ContextStore::current())
    }

    /// The store this scope overlays.
    #[inline]
    pub fn store(&self) -> &ContextStore {
        &self.store
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<ContextValue> {
        self.store.get(key)
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.store.contains(key)
    }

    /// Sets `key` to `value` until this scope closes.
    pub fn put<V>(&mut self, key: impl Into<String>, value: V) -> &mut Self
    where
        V: std::any::Any + fmt::Debug + Send + Sync,
    {
        let key = key.into();
        rail_event!(trace, key = %key, "context put");
        let previous = self.store.insert(key.clone(), ContextValue::new(value));
        self.remember(key, previous);
        self
    }

    /// Sets `key` to an existing [`ContextValue`] until this scope closes.
    pub fn put_value(&mut self, key: impl Into<String>, value: ContextValue) -> &mut Self {
        let key = key.into();
        let previous = self.store.insert(key.clone(), value);
        self.remember(key, previous);
        self
    }

    /// Removes `key` until this scope closes, returning the value it held.
    pub fn remove(&mut self, key: &str) -> Option<ContextValue> {
        rail_event!(trace, key, "context remove");
        let previous = self.store.remove(key);
        if !self.prior_values.contains_key(key) {
            self.prior_values.insert(key.to_owned(), Prior::from_value(previous.clone()));
        }
        previous
    }

    /// Returns the keys this scope has touched so far, in no particular order.
    pub fn touched_keys(&self) -> impl Iterator<Item = &str> {
        self.prior_values.keys().map(String::as_str)
    }

    /// Restores every key this scope touched. Further calls do nothing.
    pub fn close(&mut self) {
        if self.prior_values.is_empty() {
            return;
        }
        rail_event!(trace, restored = self.prior_values.len(), "context scope closed");
        for (key, prior) in self.prior_values.drain() {
            self.store.restore(key, prior.into_value());
        }
    }

    fn remember(&mut self, key: String, previous: Option<ContextValue>) {
        self.prior_values.entry(key).or_insert_with(|| Prior::from_value(previous));
    }
}

impl Drop for ScopedContext {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for ScopedContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedContext")
            .field("store", &self.store)
            .field("touched_keys", &self.prior_values.keys().collect::<Vec<_>>())
            .finish()
    }
}
