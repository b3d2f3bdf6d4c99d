use std::hash::Hash;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Per-key exclusive lock.
///
/// `try_acquire` either hands back a guard or reports the key as busy;
/// there is no queueing. Dropping the guard releases the key. Distinct
/// keys never contend.
pub struct KeyedLock<K: Eq + Hash + Clone> {
    held: Arc<DashMap<K, ()>>,
}

impl<K: Eq + Hash + Clone> KeyedLock<K> {
    /// Create a lock with no held keys
    pub fn new() -> Self {
        Self {
            held: Arc::new(DashMap::new()),
        }
    }

    /// Take the key if nobody holds it
    pub fn try_acquire(&self, key: K) -> Option<KeyedGuard<K>> {
        match self.held.entry(key.clone()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                slot.insert(());
                Some(KeyedGuard {
                    key,
                    held: Arc::clone(&self.held),
                })
            }
        }
    }

    /// Whether the key is currently held
    pub fn is_held(&self, key: &K) -> bool {
        self.held.contains_key(key)
    }
}

impl<K: Eq + Hash + Clone> Default for KeyedLock<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard releasing its key on drop
pub struct KeyedGuard<K: Eq + Hash + Clone> {
    key: K,
    held: Arc<DashMap<K, ()>>,
}

impl<K: Eq + Hash + Clone> Drop for KeyedGuard<K> {
    fn drop(&mut self) {
        self.held.remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquisition_fails_while_held() {
        let lock = KeyedLock::new();

        let guard = lock.try_acquire("mint-a").unwrap();
        assert!(lock.try_acquire("mint-a").is_none());
        assert!(lock.is_held(&"mint-a"));

        drop(guard);
        assert!(lock.try_acquire("mint-a").is_some());
    }

    #[test]
    fn distinct_keys_do_not_contend() {
        let lock = KeyedLock::new();

        let _a = lock.try_acquire("mint-a").unwrap();
        let _b = lock.try_acquire("mint-b").unwrap();

        assert!(lock.is_held(&"mint-a"));
        assert!(lock.is_held(&"mint-b"));
    }
}
