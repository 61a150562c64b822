//! Request DTOs for the cache HTTP API
//!
//! Keys and TTLs are taken as raw JSON so that null, non-string keys and
//! non-numeric TTLs are reported as cache errors rather than body rejections.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::cache::{CacheKey, Expiration};
use crate::error::Result;

/// Request body for set / put / add
#[derive(Debug, Clone, Deserialize)]
pub struct WriteRequest {
    #[serde(default)]
    pub key: Value,
    #[serde(default)]
    pub value: Value,
    /// TTL in seconds; absent means the server default
    #[serde(default, deserialize_with = "present")]
    pub ttl: Option<Value>,
}

impl WriteRequest {
    pub fn cache_key(&self) -> Result<CacheKey> {
        CacheKey::from_json(&self.key)
    }

    /// Resolves the TTL, falling back to `default_ttl` when none was sent.
    pub fn expiration(&self, default_ttl: u64) -> Result<Expiration> {
        match &self.ttl {
            Some(ttl) => Expiration::from_json(ttl),
            None => Ok(Expiration::from_secs(default_ttl)),
        }
    }
}

/// Request body for forever
#[derive(Debug, Clone, Deserialize)]
pub struct ForeverRequest {
    #[serde(default)]
    pub key: Value,
    #[serde(default)]
    pub value: Value,
}

impl ForeverRequest {
    pub fn cache_key(&self) -> Result<CacheKey> {
        CacheKey::from_json(&self.key)
    }
}

/// Request body for get / pull
#[derive(Debug, Clone, Deserialize)]
pub struct LookupRequest {
    #[serde(default)]
    pub key: Value,
    /// Returned on a miss; `false` when omitted
    #[serde(default = "default_false")]
    pub default: Value,
}

impl LookupRequest {
    pub fn cache_key(&self) -> Result<CacheKey> {
        CacheKey::from_json(&self.key)
    }
}

/// Request body for has / delete / forget
#[derive(Debug, Clone, Deserialize)]
pub struct KeyRequest {
    #[serde(default)]
    pub key: Value,
}

impl KeyRequest {
    pub fn cache_key(&self) -> Result<CacheKey> {
        CacheKey::from_json(&self.key)
    }
}

fn default_false() -> Value {
    Value::Bool(false)
}

// Keeps an explicit `null` distinct from a missing field.
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
