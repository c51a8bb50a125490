//! HandlerTable — generic, insertion-ordered handler registry.
//!
//! Registries are shared, process-wide mutable state: hosts may deliver
//! tasks on concurrent workers, so the table lives behind a `Mutex`.
//! Handlers are stored as cloneable references (`Arc<dyn Fn ...>`) and
//! cloned out of `resolve`, so the lock is never held across a handler
//! invocation.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// A mapping from handler key to handler reference.
///
/// Keys keep registration order (discovery enumerates them in the order
/// they were registered); re-registering a key overwrites the handler but
/// keeps its original position.
pub struct HandlerTable<K, H> {
    entries: Mutex<Vec<(K, H)>>,
}

impl<K, H> HandlerTable<K, H>
where
    K: Clone + PartialEq,
    H: Clone,
{
    pub fn new() -> Self {
        HandlerTable {
            entries: Mutex::new(Vec::new()),
        }
    }

    // A poisoned lock means a panic while holding it; the table itself is
    // still a valid Vec, so recover the guard rather than propagate.
    fn entries(&self) -> MutexGuard<'_, Vec<(K, H)>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store or overwrite the handler for `key`.
    pub fn register(&self, key: K, handler: H) {
        let mut entries = self.entries();
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = handler,
            None => entries.push((key, handler)),
        }
    }

    /// Look up the handler for `key`, creating and storing it from
    /// `default` if absent. The check-and-insert happens under one lock
    /// acquisition, so concurrent callers observe the same stored value.
    pub fn get_or_insert_with(&self, key: K, default: impl FnOnce() -> H) -> H {
        let mut entries = self.entries();
        if let Some((_, h)) = entries.iter().find(|(k, _)| *k == key) {
            return h.clone();
        }
        let handler = default();
        entries.push((key, handler.clone()));
        handler
    }

    /// Look up the handler for `key`, if registered.
    pub fn resolve(&self, key: &K) -> Option<H> {
        self.entries()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, h)| h.clone())
    }

    /// Remove one registration. Returns whether it existed.
    pub fn unregister(&self, key: &K) -> bool {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|(k, _)| k != key);
        entries.len() != before
    }

    /// All registered keys, in registration order.
    pub fn keys(&self) -> Vec<K> {
        self.entries().iter().map(|(k, _)| k.clone()).collect()
    }

    /// Empty the table.
    pub fn clear_all(&self) {
        self.entries().clear();
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl<K, H> Default for HandlerTable<K, H>
where
    K: Clone + PartialEq,
    H: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
