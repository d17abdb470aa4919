//! At-most-one-in-flight tracking keyed by target.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;

/// Set of keys with an operation currently running.
#[derive(Debug)]
pub struct InFlight<K: Eq + Hash + Clone> {
    active: Arc<Mutex<HashSet<K>>>,
}

impl<K: Eq + Hash + Clone> Clone for InFlight<K> {
    fn clone(&self) -> Self {
        Self {
            active: Arc::clone(&self.active),
        }
    }
}

impl<K: Eq + Hash + Clone> Default for InFlight<K> {
    fn default() -> Self {
        Self {
            active: Arc::new(Mutex::new(HashSet::new())),
        }
    }
}

impl<K: Eq + Hash + Clone> InFlight<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `key`, or `None` if it is already claimed. The claim is
    /// released when the guard drops.
    pub fn try_acquire(&self, key: K) -> Option<InFlightGuard<K>> {
        let mut active = self.active.lock();
        if !active.insert(key.clone()) {
            return None;
        }
        Some(InFlightGuard {
            active: Arc::clone(&self.active),
            key,
        })
    }

    pub fn active(&self) -> Vec<K> {
        self.active.lock().iter().cloned().collect()
    }
}

#[derive(Debug)]
pub struct InFlightGuard<K: Eq + Hash + Clone> {
    active: Arc<Mutex<HashSet<K>>>,
    key: K,
}

impl<K: Eq + Hash + Clone> Drop for InFlightGuard<K> {
    fn drop(&mut self) {
        self.active.lock().remove(&self.key);
    }
}
