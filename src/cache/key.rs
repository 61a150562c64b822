//! Cache Key Module
//!
//! Validated cache keys and expiration policies.

use std::fmt;
use std::time::Duration;

use serde_json::Value;

use crate::error::{CacheError, Result};

// == Cache Key ==
/// A non-empty cache key as supplied by the caller.
///
/// The key is only ever handed to a store in its namespaced form, see
/// [`CacheKey::namespaced`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Validates a caller-supplied key.
    pub fn new(key: impl AsRef<str>) -> Result<Self> {
        let key = key.as_ref();
        if key.is_empty() {
            return Err(CacheError::InvalidKey("key must not be empty".to_string()));
        }
        Ok(Self(key.to_string()))
    }

    /// Validates a key that arrived as untyped JSON.
    ///
    /// `null`, numbers, booleans, arrays and objects are all rejected.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::String(key) => Self::new(key),
            Value::Null => Err(CacheError::InvalidKey("key must not be null".to_string())),
            other => Err(CacheError::InvalidKey(format!(
                "key must be a string, got {}",
                json_kind(other)
            ))),
        }
    }

    /// Returns the key as supplied by the caller.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the key as seen by the store: `domain + "_" + key`.
    pub fn namespaced(&self, domain: &str) -> String {
        format!("{}_{}", domain, self.0)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// == Expiration ==
/// Time-to-live of a cache entry in whole seconds.
///
/// Zero means never expires. A negative TTL is accepted and yields an entry
/// that is already expired when written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Expiration(i64);

impl Expiration {
    /// An expiration policy that never expires.
    pub const NEVER: Expiration = Expiration(0);

    /// TTLs beyond `i64::MAX` seconds are clamped.
    pub fn from_secs(secs: u64) -> Self {
        Self(i64::try_from(secs).unwrap_or(i64::MAX))
    }

    /// Parses a TTL that arrived as untyped JSON.
    ///
    /// Accepts integers, finite floats (truncated) and strings holding
    /// either. Everything else is `InvalidExpiration`.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_u64().map(|_| i64::MAX))
                .or_else(|| n.as_f64().and_then(whole_seconds))
                .map(Self)
                .ok_or_else(|| invalid_expiration(value)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(whole_seconds))
                    .map(Self)
                    .ok_or_else(|| invalid_expiration(value))
            }
            _ => Err(invalid_expiration(value)),
        }
    }

    /// TTL in seconds (0 = never, negative = already expired).
    pub fn as_secs(&self) -> i64 {
        self.0
    }

    pub fn is_never(&self) -> bool {
        self.0 == 0
    }

    /// Lifetime of the entry, or `None` if it never expires.
    ///
    /// Negative TTLs have a zero lifetime.
    pub fn as_duration(&self) -> Option<Duration> {
        if self.is_never() {
            None
        } else {
            Some(Duration::from_secs(self.0.max(0).unsigned_abs()))
        }
    }
}

// Float-to-int casts saturate, so huge values clamp to the i64 range.
fn whole_seconds(secs: f64) -> Option<i64> {
    if secs.is_finite() {
        Some(secs.trunc() as i64)
    } else {
        None
    }
}

fn invalid_expiration(value: &Value) -> CacheError {
    CacheError::InvalidExpiration(format!("expected a number, got {}", value))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
