//! Per-key async mutation locks
//!
//! One `tokio::sync::Mutex` per key, created on first use and dropped again
//! when the last holder or waiter lets go, so the table only ever holds keys
//! with a mutation in flight.

use dashmap::DashMap;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Table of per-key mutexes.
pub struct KeyedLocks<K: Eq + Hash + Clone> {
    locks: DashMap<K, Arc<Mutex<()>>>,
}

impl<K: Eq + Hash + Clone> KeyedLocks<K> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Wait for exclusive access to `key`. Waiters are served in FIFO order.
    pub async fn acquire(&self, key: K) -> KeyedGuard<'_, K> {
        // Cloned under the shard lock, so cleanup in `Drop` sees this waiter.
        let lock = self.locks.entry(key.clone()).or_default().clone();
        let guard = lock.lock_owned().await;
        KeyedGuard {
            table: self,
            key,
            guard: Some(guard),
        }
    }

    /// Keys currently locked or waited on.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl<K: Eq + Hash + Clone> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive access to one key. Releasing the last reference removes the
/// key from the table.
pub struct KeyedGuard<'a, K: Eq + Hash + Clone> {
    table: &'a KeyedLocks<K>,
    key: K,
    guard: Option<OwnedMutexGuard<()>>,
}

impl<K: Eq + Hash + Clone> Drop for KeyedGuard<'_, K> {
    fn drop(&mut self) {
        // Release first: the guard owns one reference to the mutex.
        self.guard.take();
        self.table
            .locks
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}
