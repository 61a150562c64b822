//! Memory Store Module
//!
//! Thread-safe HashMap-backed store with TTL expiration.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tracing::debug;

use crate::cache::Expiration;
use crate::error::{CacheError, Result};
use crate::store::{KeyValueStore, StoreStats, StoredEntry, MAX_KEY_LENGTH, MAX_VALUE_SIZE};

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, StoredEntry>,
    stats: StoreStats,
}

// == Memory Store ==
/// In-process key-value store.
///
/// Expired entries read as absent and are dropped on access or by
/// [`MemoryStore::purge_expired`]. There is no eviction policy.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        let mut inner = self.lock();
        let before = inner.entries.len();
        inner.entries.retain(|_, entry| !entry.is_expired());

        let removed = before - inner.entries.len();
        let total = inner.entries.len();
        inner.stats.record_expirations(removed);
        inner.stats.set_total_entries(total);
        removed
    }

    /// Returns remaining TTL in seconds for a live entry.
    ///
    /// `Some(None)` means the entry never expires.
    pub fn ttl_remaining(&self, key: &str) -> Option<Option<u64>> {
        let inner = self.lock();
        inner
            .entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(StoredEntry::ttl_remaining)
    }

    // == Stats ==
    /// Returns current store statistics.
    pub fn stats(&self) -> StoreStats {
        let inner = self.lock();
        let mut stats = inner.stats.clone();
        stats.set_total_entries(inner.entries.len());
        stats
    }

    /// Returns the current number of entries, including any not yet purged.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn store_set(&self, key: &str, value: Value, ttl: Expiration) -> Result<()> {
        if key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::StoreRejected(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }

        let size = serde_json::to_vec(&value)?.len();
        if size > MAX_VALUE_SIZE {
            return Err(CacheError::StoreRejected(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }

        let mut inner = self.lock();
        inner
            .entries
            .insert(key.to_string(), StoredEntry::new(value, ttl));
        let total = inner.entries.len();
        inner.stats.set_total_entries(total);
        Ok(())
    }

    fn store_get(&self, key: &str) -> Option<Value> {
        let mut guard = self.lock();
        let inner = &mut *guard;

        let expired = match inner.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                let value = entry.value.clone();
                inner.stats.record_hit();
                return Some(value);
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            debug!("Dropping expired entry {}", key);
            inner.entries.remove(key);
            let total = inner.entries.len();
            inner.stats.record_expirations(1);
            inner.stats.set_total_entries(total);
        }
        inner.stats.record_miss();
        None
    }

    fn store_delete(&self, key: &str) {
        let mut inner = self.lock();
        if inner.entries.remove(key).is_some() {
            let total = inner.entries.len();
            inner.stats.set_total_entries(total);
        }
    }
}
