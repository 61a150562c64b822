//! Cache Module
//!
//! The cache facade: key validation, namespacing and read-through memoization
//! over a pluggable key-value store.

mod facade;
mod key;


// Re-export public types
pub use facade::CacheFacade;
pub use key::{CacheKey, Expiration};

// == Public Constants ==
/// Namespace prefix used when none is configured
pub const DEFAULT_DOMAIN: &str = "cached";
