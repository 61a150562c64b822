//! Store Module
//!
//! The key-value store contract the cache facade dispatches to, plus an
//! in-memory implementation with TTL expiration.

mod entry;
mod memory;
mod stats;

use std::sync::Arc;

use serde_json::Value;

use crate::cache::Expiration;
use crate::error::Result;

// Re-export public types
pub use entry::StoredEntry;
pub use memory::MemoryStore;
pub use stats::StoreStats;

// == Public Constants ==
/// Maximum allowed namespaced key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed serialized value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

// == Key-Value Store ==
/// Storage backend behind a [`CacheFacade`](crate::cache::CacheFacade).
///
/// Keys passed in are already namespaced. The store owns expiration and any
/// concurrency control; the facade holds no state of its own.
pub trait KeyValueStore: Send + Sync {
    /// Writes `value` under `key`, replacing any previous entry.
    fn store_set(&self, key: &str, value: Value, ttl: Expiration) -> Result<()>;

    /// Reads a live entry. `None` is the only miss signal.
    fn store_get(&self, key: &str) -> Option<Value>;

    /// Removes an entry. Absent keys are ignored.
    fn store_delete(&self, key: &str);
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn store_set(&self, key: &str, value: Value, ttl: Expiration) -> Result<()> {
        (**self).store_set(key, value, ttl)
    }

    fn store_get(&self, key: &str) -> Option<Value> {
        (**self).store_get(key)
    }

    fn store_delete(&self, key: &str) {
        (**self).store_delete(key)
    }
}
