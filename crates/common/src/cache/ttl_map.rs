use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;

#[derive(Debug, Clone)]
struct Stamped<V> {
    value: V,
    stored_at: DateTime<Utc>,
}

/// Map whose entries expire `ttl` after they were stored.
///
/// An entry is fresh while `now - stored_at <= ttl`. Writes overwrite
/// unconditionally, so two concurrent recomputations resolve last-write-wins.
#[derive(Debug)]
pub struct TtlMap<K, V> {
    ttl: Duration,
    entries: RwLock<HashMap<K, Stamped<V>>>,
}

impl<K, V> TtlMap<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Create an empty map with the given time-to-live.
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entries: RwLock::new(HashMap::new()) }
    }

    /// Configured time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return a clone of the value if it is still fresh at `now`.
    pub fn get_fresh<Q>(&self, key: &Q, now: DateTime<Utc>) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let entries = self.entries.read();
        entries
            .get(key)
            .filter(|entry| now.signed_duration_since(entry.stored_at) <= self.ttl)
            .map(|entry| entry.value.clone())
    }

    /// Store `value`, replacing whatever was there.
    pub fn insert(&self, key: K, value: V, stored_at: DateTime<Utc>) {
        self.entries.write().insert(key, Stamped { value, stored_at });
    }

    /// Drop the entry for `key`. Returns `true` if one existed.
    pub fn invalidate<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.write().remove(key).is_some()
    }

    /// Number of entries, fresh or not.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
