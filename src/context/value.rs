use std::any::Any;
use std::fmt;
use std::sync::Arc;

trait ContextData: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + fmt::Debug + Send + Sync> ContextData for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A type-erased diagnostic value stored in a [`ContextStore`](super::ContextStore).
///
/// Cloning shares the underlying value.
///
/// # Examples
///
/// ```
/// use check_rail::ContextValue;
///
/// let value = ContextValue::new(42_u32);
/// assert_eq!(value.downcast_ref::<u32>(), Some(&42));
/// assert_eq!(value.downcast_ref::<i64>(), None);
/// assert_eq!(value.render(), "42");
/// ```
#[derive(Clone)]
pub struct ContextValue {
    inner: Arc<dyn ContextData>,
}

impl ContextValue {
    #[inline]
    pub fn new<T: Any + fmt::Debug + Send + Sync>(value: T) -> Self {
        Self { inner: Arc::new(value) }
    }

    /// Returns the value if it is a `T`.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.inner).as_any().downcast_ref::<T>()
    }

    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        (*self.inner).as_any().is::<T>()
    }

    /// Renders the value for diagnostics, using its `Debug` representation.
    #[inline]
    pub fn render(&self) -> String {
        format!("{:?}", self.inner)
    }

    /// Returns `true` if both handles share the same value.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.inner, f)
    }
}
