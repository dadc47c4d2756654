//! Per-key async mutex.
//!
//! Callers holding the guard for key `k` exclude other callers for `k` only;
//! unrelated keys never contend. Used to single-flight work such as token
//! refresh per connection.

use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::trace;

/// Registry of lazily created mutexes, one per key.
#[derive(Debug)]
pub struct KeyedLock<K>
where
    K: Eq + Hash,
{
    locks: DashMap<K, Arc<Mutex<()>>>,
}

impl<K> Default for KeyedLock<K>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self { locks: DashMap::new() }
    }
}

impl<K> KeyedLock<K>
where
    K: Eq + Hash + Clone,
{
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`.
    ///
    /// The guard is owned so it can be held across `.await` points without
    /// borrowing the registry.
    pub async fn acquire(&self, key: &K) -> OwnedMutexGuard<()> {
        let lock = self.locks.entry(key.clone()).or_insert_with(|| Arc::new(Mutex::new(()))).clone();
        trace!(keys = self.locks.len(), "acquiring keyed lock");
        lock.lock_owned().await
    }

    /// Number of keys that have ever been locked.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether no key has been locked yet.
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
