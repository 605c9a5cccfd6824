use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

/// A read-mostly value that is replaced wholesale, never mutated in place.
///
/// Readers take an `Arc` to the current value with [`load()`](Self::load)
/// and keep using it for as long as they like; a concurrent
/// [`store()`](Self::store) publishes a new value without disturbing them.
/// Meant for reference data (e.g. the full monster list) that a background
/// task refreshes while queries are being evaluated against it.
#[derive(Debug, Default)]
pub struct Snapshot<T> {
    current: RwLock<Arc<T>>,
}

impl<T> Snapshot<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            current: RwLock::new(Arc::new(value)),
        }
    }

    /// The value published most recently.
    #[must_use]
    pub fn load(&self) -> Arc<T> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Publish a new value.
    pub fn store(&self, value: T) {
        let _ = self.replace(value);
    }

    /// Publish a new value and return the one it replaced.
    pub fn replace(&self, value: T) -> Arc<T> {
        let next = Arc::new(value);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        debug!("published new snapshot");
        std::mem::replace(&mut *guard, next)
    }
}

impl<T> From<T> for Snapshot<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_returns_current() {
        let snap = Snapshot::new(vec![1, 2, 3]);
        assert_eq!(*snap.load(), vec![1, 2, 3]);
    }

    #[test]
    fn readers_keep_their_view_across_store() {
        let snap = Snapshot::new(vec![1, 2, 3]);
        let before = snap.load();
        snap.store(vec![4]);
        assert_eq!(*before, vec![1, 2, 3]);
        assert_eq!(*snap.load(), vec![4]);
    }

    #[test]
    fn replace_returns_previous() {
        let snap = Snapshot::from("old");
        let old = snap.replace("new");
        assert_eq!(*old, "old");
        assert_eq!(*snap.load(), "new");
    }

    #[test]
    fn default_is_default_value() {
        let snap: Snapshot<Vec<u8>> = Snapshot::default();
        assert!(snap.load().is_empty());
    }
}
