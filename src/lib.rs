//! Cache Facade - a namespaced key-value cache front
//!
//! Validates keys, prefixes them with a fixed domain and dispatches to a
//! pluggable store. Adds pull, add-if-absent and read-through `remember`
//! on top of plain get/set/delete, plus an HTTP server over an in-memory store.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheFacade, CacheKey, Expiration};
pub use config::Config;
pub use error::{CacheError, Result};
pub use store::{KeyValueStore, MemoryStore};
pub use tasks::spawn_cleanup_task;
