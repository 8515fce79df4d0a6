use std::sync::Arc;

use parking_lot::Mutex;

/// Caller-side stabilisation of a computed value.
///
/// Returns the same `Arc` for as long as the dependencies compare equal, so that a caller can
/// skip `provide` when nothing changed, or so that subscribers can detect an unchanged value with
/// [`Arc::ptr_eq`]. A [`Context`](super::Context) never performs this comparison by itself.
///
/// ```rust
/// use std::sync::Arc;
/// use value_context::Memo;
///
/// let memo = Memo::new();
/// let first = memo.get(("dark", 14u8), |(mode, size)| format!("{mode}/{size}"));
/// let second = memo.get(("dark", 14u8), |(mode, size)| format!("{mode}/{size}"));
///
/// assert!(Arc::ptr_eq(&first, &second));
/// ```
pub struct Memo<D, V> {
    cached: Mutex<Option<(D, Arc<V>)>>,
}

impl<D: PartialEq, V> Memo<D, V> {
    pub fn new() -> Self {
        Self {
            cached: Mutex::new(None),
        }
    }

    /// `compute` runs while the memo is locked; it must not call back into the same memo.
    pub fn get<F>(&self, deps: D, compute: F) -> Arc<V>
    where
        F: FnOnce(&D) -> V,
    {
        let mut cached = self.cached.lock();
        if let Some((previous, value)) = cached.as_ref() {
            if *previous == deps {
                return value.clone();
            }
        }

        let value = Arc::new(compute(&deps));
        *cached = Some((deps, value.clone()));
        value
    }

    pub fn clear(&self) {
        *self.cached.lock() = None;
    }
}

impl<D: PartialEq, V> Default for Memo<D, V> {
    fn default() -> Self {
        Self::new()
    }
}
