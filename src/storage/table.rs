//! Key-Value Table Module
//!
//! String-keyed entry map behind its own read/write lock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::storage::Entry;

// == Key-Value Table ==
/// Maps keys to entries. Writers take the exclusive lock, readers share it.
#[derive(Debug)]
pub struct KvTable<T> {
    entries: RwLock<HashMap<String, Entry<T>>>,
    /// Running total of entries removed by `purge_expired`
    purged: AtomicU64,
}

impl<T> KvTable<T> {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            purged: AtomicU64::new(0),
        }
    }

    // == Set ==
    /// Stores a value, replacing any previous entry for the key.
    ///
    /// The expiry is computed before the lock is taken, so readers only ever
    /// see a complete entry.
    pub fn set(&self, key: String, value: T, ttl: Duration) {
        let entry = Entry::new(value, ttl);
        self.entries.write().insert(key, entry);
    }

    // == Delete ==
    /// Removes a key. Absent keys are ignored.
    pub fn delete(&self, key: &str) {
        self.entries.write().remove(key);
    }

    // == Purge Expired ==
    /// Removes every expired entry and returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let removed = {
            let mut entries = self.entries.write();
            let before = entries.len();
            entries.retain(|_, entry| !entry.is_expired_at(now));
            before - entries.len()
        };

        self.purged.fetch_add(removed as u64, Ordering::Relaxed);
        removed
    }

    // == Length ==
    /// Number of physically present entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Total number of entries removed by sweeps so far.
    pub fn purged(&self) -> u64 {
        self.purged.load(Ordering::Relaxed)
    }
}

impl<T: Clone> KvTable<T> {
    // == Get ==
    /// Returns the value if the key is present and not expired.
    ///
    /// Expired entries are hidden but left in place for the reaper.
    pub fn get(&self, key: &str) -> Option<T> {
        let entries = self.entries.read();
        entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone())
    }
}

impl<T> Default for KvTable<T> {
    fn default() -> Self {
        Self::new()
    }
}
