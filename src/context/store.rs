use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{ContextValue, ScopedContext};

type ContextMap = BTreeMap<String, ContextValue>;

thread_local! {
    static THREAD_STORE: ContextStore = ContextStore::new();
}

#[cfg(feature = "async")]
tokio::task_local! {
    static TASK_STORE: ContextStore;
}

/// The key/value map that scopes overlay.
///
/// A store is a shared handle: clones see the same map. Every thread owns one
/// store for its whole lifetime, reachable through [`ContextStore::current`];
/// independent stores can be created with [`ContextStore::new`] and passed
/// explicitly. The map is only ever mutated through a [`ScopedContext`], so
/// every change is undone when the scope that made it closes.
///
/// # Examples
///
/// ```
/// use check_rail::ContextStore;
///
/// let store = ContextStore::new();
/// {
///     let mut scope = store.scope();
///     scope.put("request_id", "r-17");
///     assert_eq!(store.get("request_id").unwrap().downcast_ref::<&str>(), Some(&"r-17"));
/// }
/// assert!(!store.contains("request_id"));
/// ```
#[derive(Clone, Default)]
pub struct ContextStore {
    map: Arc<Mutex<ContextMap>>,
}

impl ContextStore {
    /// Creates an empty store that is not bound to any thread or task.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the store of the current task when running inside
    /// [`scope_task`](Self::scope_task), otherwise the calling thread's store.
    pub fn current() -> Self {
        #[cfg(feature = "async")]
        if let Ok(store) = TASK_STORE.try_with(Clone::clone) {
            return store;
        }
        THREAD_STORE.with(Clone::clone)
    }

    /// Runs `future` with `self` as the store returned by
    /// [`current`](Self::current), for as long as the future runs and on
    /// whichever worker thread polls it.
    #[cfg(feature = "async")]
    pub async fn scope_task<F>(self, future: F) -> F::Output
    where
        F: core::future::Future,
    {
        TASK_STORE.scope(self, future).await
    }

    /// Opens a new scope over this store.
    #[inline]
    pub fn scope(&self) -> ScopedContext {
        ScopedContext::open(self.clone())
    }

    /// Returns the current value of `key`, regardless of which scope set it.
    pub fn get(&self, key: &str) -> Option<ContextValue> {
        self.lock().get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns every entry, sorted by key.
    pub fn snapshot(&self) -> Vec<(String, ContextValue)> {
        self.lock().iter().map(|(key, value)| (key.clone(), value.clone())).collect()
    }

    /// Returns `true` if both handles refer to the same map.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.map, &other.map)
    }

    pub(crate) fn insert(&self, key: String, value: ContextValue) -> Option<ContextValue> {
        self.lock().insert(key, value)
    }

    pub(crate) fn remove(&self, key: &str) -> Option<ContextValue> {
        self.lock().remove(key)
    }

    /// Sets `key` to `value`, or removes it when `value` is `None`.
    pub(crate) fn restore(&self, key: String, value: Option<ContextValue>) {
        let mut map = self.lock();
        match value {
            Some(value) => {
                map.insert(key, value);
            }
            None => {
                map.remove(&key);
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, ContextMap> {
        // Every critical section is a single map operation, so a poisoned map
        // is still consistent.
        self.map.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ContextStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.lock().iter()).finish()
    }
}
