//! Cache Facade Module
//!
//! Validated, namespaced get/set/delete over a [`KeyValueStore`], with
//! read-through memoization via [`CacheFacade::remember`].

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::cache::{CacheKey, Expiration, DEFAULT_DOMAIN};
use crate::error::Result;
use crate::store::KeyValueStore;

// == Cache Facade ==
/// Stateless front for a key-value store.
///
/// Every key is validated and prefixed with `domain + "_"` before the store
/// sees it. Values are held as JSON, so anything `Serialize` can be cached and
/// read back as any `DeserializeOwned` type.
///
/// A stored value of any kind, including `false` or `null`, counts as present:
/// only the store's own not-found signal is a miss.
///
/// `remember` offers no single-flight guarantee. Concurrent callers on a cold
/// key may each run the producer; the last write wins.
#[derive(Debug, Clone)]
pub struct CacheFacade<S> {
    store: S,
    domain: String,
}

impl<S: KeyValueStore> CacheFacade<S> {
    // == Constructors ==
    /// Creates a facade using the default `"cached"` namespace.
    pub fn new(store: S) -> Self {
        Self::with_domain(store, DEFAULT_DOMAIN)
    }

    pub fn with_domain(store: S, domain: impl Into<String>) -> Self {
        Self {
            store,
            domain: domain.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl` seconds (0 = never expires).
    pub fn set<V: Serialize + ?Sized>(&self, key: &str, value: &V, ttl: u64) -> Result<()> {
        let key = CacheKey::new(key)?;
        let value = serde_json::to_value(value)?;
        self.write(&key, value, Expiration::from_secs(ttl))
    }

    /// Alias for [`CacheFacade::set`].
    pub fn put<V: Serialize + ?Sized>(&self, key: &str, value: &V, ttl: u64) -> Result<()> {
        self.set(key, value, ttl)
    }

    /// Stores an already-encoded JSON value with an already-validated TTL.
    pub fn set_value(&self, key: &str, value: Value, ttl: Expiration) -> Result<()> {
        let key = CacheKey::new(key)?;
        self.write(&key, value, ttl)
    }

    /// Stores `value` with no expiration.
    pub fn forever<V: Serialize + ?Sized>(&self, key: &str, value: &V) -> Result<()> {
        self.set(key, value, 0)
    }

    /// Stores `value` only if nothing is cached under `key`.
    ///
    /// Returns `true` if the value was stored.
    pub fn add<V: Serialize + ?Sized>(&self, key: &str, value: &V, ttl: u64) -> Result<bool> {
        CacheKey::new(key)?;
        let value = serde_json::to_value(value)?;
        self.add_value(key, value, Expiration::from_secs(ttl))
    }

    /// [`CacheFacade::add`] for an already-encoded JSON value.
    pub fn add_value(&self, key: &str, value: Value, ttl: Expiration) -> Result<bool> {
        if self.has(key)? {
            return Ok(false);
        }
        self.set_value(key, value, ttl)?;
        Ok(true)
    }

    // == Get ==
    /// Returns the cached value, or `default` on a miss.
    pub fn get<V: DeserializeOwned>(&self, key: &str, default: V) -> Result<V> {
        Ok(self.find(key)?.unwrap_or(default))
    }

    /// Returns the cached value, or `None` on a miss.
    pub fn find<V: DeserializeOwned>(&self, key: &str) -> Result<Option<V>> {
        let key = CacheKey::new(key)?;
        self.read(&key)
            .map(serde_json::from_value::<V>)
            .transpose()
            .map_err(Into::into)
    }

    /// Returns true if anything is cached under `key`.
    pub fn has(&self, key: &str) -> Result<bool> {
        let key = CacheKey::new(key)?;
        Ok(self.read(&key).is_some())
    }

    // == Delete ==
    /// Removes the entry under `key`. Absent keys are not an error.
    pub fn delete(&self, key: &str) -> Result<()> {
        let key = CacheKey::new(key)?;
        self.store.store_delete(&key.namespaced(&self.domain));
        Ok(())
    }

    /// Alias for [`CacheFacade::delete`].
    pub fn forget(&self, key: &str) -> Result<()> {
        self.delete(key)
    }

    /// Returns the cached value (or `default`) and removes the entry.
    ///
    /// The entry is removed even if it cannot be decoded as `V`.
    pub fn pull<V: DeserializeOwned>(&self, key: &str, default: V) -> Result<V> {
        let key = CacheKey::new(key)?;
        let cached = self.read(&key);
        self.store.store_delete(&key.namespaced(&self.domain));

        match cached {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(default),
        }
    }

    // == Remember ==
    /// Returns the cached value, or runs `producer`, stores its result for
    /// `ttl` seconds and returns it.
    pub fn remember<V, F>(&self, key: &str, ttl: u64, producer: F) -> Result<V>
    where
        V: Serialize + DeserializeOwned,
        F: FnOnce() -> V,
    {
        self.remember_with(key, ttl, |()| producer(), ())
    }

    /// Like [`CacheFacade::remember`], passing `params` to the producer on a miss.
    pub fn remember_with<V, P, F>(&self, key: &str, ttl: u64, producer: F, params: P) -> Result<V>
    where
        V: Serialize + DeserializeOwned,
        F: FnOnce(P) -> V,
    {
        if let Some(cached) = self.find(key)? {
            return Ok(cached);
        }

        debug!("Cache miss for {}, computing value", key);
        let value = producer(params);
        self.set(key, &value, ttl)?;
        Ok(value)
    }

    /// [`CacheFacade::remember`] with no expiration.
    pub fn remember_forever<V, F>(&self, key: &str, producer: F) -> Result<V>
    where
        V: Serialize + DeserializeOwned,
        F: FnOnce() -> V,
    {
        self.remember(key, 0, producer)
    }

    // == Store Dispatch ==
    fn read(&self, key: &CacheKey) -> Option<Value> {
        let cached = self.store.store_get(&key.namespaced(&self.domain));
        debug!(
            "Cache {} for {}",
            if cached.is_some() { "hit" } else { "miss" },
            key
        );
        cached
    }

    fn write(&self, key: &CacheKey, value: Value, ttl: Expiration) -> Result<()> {
        debug!("Caching {} for {}s", key, ttl.as_secs());
        self.store
            .store_set(&key.namespaced(&self.domain), value, ttl)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;
    use crate::store::MemoryStore;
    use serde::Deserialize;
    use serde_json::json;
    use std::cell::Cell;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::thread::sleep;
    use std::time::Duration;

    /// Records every call so tests can check namespacing and short-circuiting.
    #[derive(Default)]
    struct RecordingStore {
        entries: Mutex<HashMap<String, (Value, Expiration)>>,
        calls: AtomicUsize,
    }

    impl RecordingStore {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn keys(&self) -> Vec<String> {
            self.entries.lock().unwrap().keys().cloned().collect()
        }

        fn ttl_of(&self, key: &str) -> Option<Expiration> {
            self.entries
                .lock()
                .unwrap()
                .get(key)
                .map(|(_, ttl)| *ttl)
        }
    }

    impl KeyValueStore for RecordingStore {
        fn store_set(&self, key: &str, value: Value, ttl: Expiration) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), (value, ttl));
            Ok(())
        }

        fn store_get(&self, key: &str) -> Option<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.entries
                .lock()
                .unwrap()
                .get(key)
                .map(|(v, _)| v.clone())
        }

        fn store_delete(&self, key: &str) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.entries.lock().unwrap().remove(key);
        }
    }

    fn facade() -> CacheFacade<MemoryStore> {
        CacheFacade::new(MemoryStore::new())
    }

    #[test]
    fn test_set_get_delete_scenario() {
        let cache = facade();

        cache.set("greeting", "hi", 0).unwrap();
        assert_eq!(cache.get("greeting", String::new()).unwrap(), "hi");

        cache.delete("greeting").unwrap();
        assert_eq!(cache.get("greeting", "bye".to_string()).unwrap(), "bye");
        assert!(!cache.has("greeting").unwrap());
    }

    #[test]
    fn test_keys_are_namespaced() {
        let cache = CacheFacade::new(RecordingStore::default());

        cache.put("greeting", "hi", 0).unwrap();
        assert_eq!(cache.store().keys(), vec!["cached_greeting".to_string()]);

        let custom = CacheFacade::with_domain(RecordingStore::default(), "sessions");
        custom.put("abc", &1, 0).unwrap();
        assert_eq!(custom.store().keys(), vec!["sessions_abc".to_string()]);
        assert_eq!(custom.domain(), "sessions");
    }

    #[test]
    fn test_invalid_key_never_reaches_store() {
        let cache = CacheFacade::new(RecordingStore::default());

        assert!(matches!(
            cache.get("", false),
            Err(CacheError::InvalidKey(_))
        ));
        assert!(matches!(
            cache.set("", &1, 0),
            Err(CacheError::InvalidKey(_))
        ));
        assert!(matches!(cache.has(""), Err(CacheError::InvalidKey(_))));
        assert!(matches!(cache.delete(""), Err(CacheError::InvalidKey(_))));
        assert!(matches!(cache.forget(""), Err(CacheError::InvalidKey(_))));
        assert!(matches!(cache.pull("", 0), Err(CacheError::InvalidKey(_))));
        assert!(matches!(
            cache.add("", &1, 0),
            Err(CacheError::InvalidKey(_))
        ));
        assert!(matches!(
            cache.forever("", &1),
            Err(CacheError::InvalidKey(_))
        ));
        assert!(matches!(
            cache.remember("", 0, || 1),
            Err(CacheError::InvalidKey(_))
        ));

        assert_eq!(cache.store().calls(), 0);
    }

    #[test]
    fn test_get_returns_default_on_miss() {
        let cache = facade();
        assert!(!cache.get("missing", false).unwrap());
        assert_eq!(cache.get("missing", 7).unwrap(), 7);
        assert_eq!(cache.find::<i32>("missing").unwrap(), None);
    }

    #[test]
    fn test_false_value_is_a_hit() {
        let cache = facade();

        cache.forever("flag", &false).unwrap();
        assert!(cache.has("flag").unwrap());
        assert!(!cache.get("flag", true).unwrap());
        assert!(!cache.add("flag", &true, 0).unwrap());
        assert!(!cache.remember("flag", 0, || true).unwrap());
    }

    #[test]
    fn test_null_value_is_a_hit() {
        let cache = facade();

        cache.forever("nothing", &Value::Null).unwrap();
        assert!(cache.has("nothing").unwrap());
        assert_eq!(cache.find::<Option<i32>>("nothing").unwrap(), Some(None));
    }

    #[test]
    fn test_structured_values() {
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        struct User {
            id: u32,
            name: String,
        }

        let cache = facade();
        let user = User {
            id: 7,
            name: "ada".to_string(),
        };

        cache.forever("user:7", &user).unwrap();
        assert_eq!(cache.find::<User>("user:7").unwrap(), Some(user));
    }

    #[test]
    fn test_type_mismatch_is_serialization_error() {
        let cache = facade();

        cache.forever("word", "hello").unwrap();
        assert!(matches!(
            cache.get::<u32>("word", 0),
            Err(CacheError::Serialization(_))
        ));
    }

    #[test]
    fn test_add_only_when_absent() {
        let cache = facade();

        assert!(cache.add("k", "v1", 0).unwrap());
        assert!(!cache.add("k", "v2", 0).unwrap());
        assert_eq!(cache.get("k", String::new()).unwrap(), "v1");
    }

    #[test]
    fn test_pull_reads_then_deletes() {
        let cache = facade();

        cache.set("token", "abc", 0).unwrap();
        assert_eq!(cache.pull("token", String::new()).unwrap(), "abc");
        assert!(!cache.has("token").unwrap());
        assert_eq!(cache.pull("token", "none".to_string()).unwrap(), "none");
    }

    #[test]
    fn test_pull_deletes_even_on_decode_failure() {
        let cache = facade();

        cache.set("word", "hello", 0).unwrap();
        assert!(cache.pull::<u32>("word", 0).is_err());
        assert!(!cache.has("word").unwrap());
    }

    #[test]
    fn test_forever_uses_zero_ttl() {
        let cache = CacheFacade::new(RecordingStore::default());

        cache.forever("k", "v").unwrap();
        assert_eq!(cache.store().ttl_of("cached_k"), Some(Expiration::NEVER));

        cache.set("t", "v", 30).unwrap();
        assert_eq!(
            cache.store().ttl_of("cached_t"),
            Some(Expiration::from_secs(30))
        );
    }

    #[test]
    fn test_remember_computes_once() {
        let cache = facade();
        let calls = Cell::new(0);

        let first = cache
            .remember("count", 0, || {
                calls.set(calls.get() + 1);
                42
            })
            .unwrap();
        let second = cache
            .remember("count", 0, || {
                calls.set(calls.get() + 1);
                99
            })
            .unwrap();

        assert_eq!(first, 42);
        assert_eq!(second, 42);
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.get("count", 0).unwrap(), 42);
    }

    #[test]
    fn test_remember_recomputes_after_delete() {
        let cache = facade();

        assert_eq!(cache.remember("n", 0, || 1).unwrap(), 1);
        cache.forget("n").unwrap();
        assert_eq!(cache.remember("n", 0, || 2).unwrap(), 2);
    }

    #[test]
    fn test_remember_recomputes_after_expiration() {
        let cache = facade();
        let calls = Cell::new(0);
        let produce = || {
            calls.set(calls.get() + 1);
            calls.get()
        };

        assert_eq!(cache.remember("k", 1, produce).unwrap(), 1);
        assert_eq!(cache.remember("k", 1, produce).unwrap(), 1);
        assert!(cache.has("k").unwrap());

        // Wait for the TTL to lapse
        sleep(Duration::from_millis(1100));

        assert!(!cache.has("k").unwrap());
        assert_eq!(cache.get("k", 0).unwrap(), 0);

        assert_eq!(cache.remember("k", 1, produce).unwrap(), 2);
        assert_eq!(calls.get(), 2);
        assert!(cache.has("k").unwrap());
    }

    #[test]
    fn test_negative_ttl_is_stored_expired() {
        let cache = facade();
        let ttl = Expiration::from_json(&json!(-5)).unwrap();

        cache.set_value("stale", json!("v"), ttl).unwrap();
        assert!(!cache.has("stale").unwrap());
        let added = cache
            .add_value("stale", json!("fresh"), Expiration::NEVER)
            .unwrap();
        assert!(added);
        assert_eq!(cache.get("stale", Value::Null).unwrap(), json!("fresh"));
    }

    #[test]
    fn test_huge_ttl_does_not_expire_early() {
        let cache = facade();
        let secs = json!(18_446_744_073_709_552u64);
        let ttl = Expiration::from_json(&secs).unwrap();

        cache.set_value("big", json!("v"), ttl).unwrap();
        sleep(Duration::from_millis(600));
        assert!(cache.has("big").unwrap());
    }

    #[test]
    fn test_remember_with_params() {
        let cache = facade();

        let sum = cache
            .remember_with("sum", 60, |(a, b): (i32, i32)| a + b, (2, 3))
            .unwrap();
        assert_eq!(sum, 5);

        let cached = cache
            .remember_with("sum", 60, |(a, b): (i32, i32)| a * b, (2, 3))
            .unwrap();
        assert_eq!(cached, 5);
    }

    #[test]
    fn test_remember_forever_returns_value() {
        let cache = CacheFacade::new(RecordingStore::default());

        let value = cache
            .remember_forever("config", || vec!["a".to_string(), "b".to_string()])
            .unwrap();
        assert_eq!(value, vec!["a", "b"]);
        assert_eq!(
            cache.store().ttl_of("cached_config"),
            Some(Expiration::NEVER)
        );
    }

    #[test]
    fn test_set_value_with_parsed_expiration() {
        let cache = facade();
        let ttl = Expiration::from_json(&json!("60")).unwrap();

        cache.set_value("raw", json!({"a": 1}), ttl).unwrap();
        assert_eq!(cache.get("raw", Value::Null).unwrap(), json!({"a": 1}));
    }
}
