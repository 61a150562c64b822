//! API Handlers
//!
//! HTTP request handlers, one per facade operation.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::Value;

use crate::cache::CacheFacade;
use crate::config::Config;
use crate::error::Result;
use crate::models::{
    AddResponse, DeleteResponse, ForeverRequest, GetResponse, HasResponse, HealthResponse,
    KeyRequest, LookupRequest, SetResponse, StatsResponse, WriteRequest,
};
use crate::store::MemoryStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Facade over the shared in-memory store
    pub cache: Arc<CacheFacade<Arc<MemoryStore>>>,
    /// TTL applied to writes that omit one
    pub default_ttl: u64,
}

impl AppState {
    /// Creates a new AppState over the given store, using the default namespace.
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self {
            cache: Arc::new(CacheFacade::new(store)),
            default_ttl: 0,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            cache: Arc::new(CacheFacade::with_domain(store, config.domain.clone())),
            default_ttl: config.default_ttl,
        }
    }

    /// The underlying store, for background tasks and stats.
    pub fn store(&self) -> &Arc<MemoryStore> {
        self.cache.store()
    }
}

/// Handler for POST /cache/set and POST /cache/put
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<WriteRequest>,
) -> Result<Json<SetResponse>> {
    let key = req.cache_key()?;
    let ttl = req.expiration(state.default_ttl)?;

    state.cache.set_value(key.as_str(), req.value, ttl)?;

    Ok(Json(SetResponse::new(key.as_str())))
}

/// Handler for POST /cache/add
pub async fn add_handler(
    State(state): State<AppState>,
    Json(req): Json<WriteRequest>,
) -> Result<Json<AddResponse>> {
    let key = req.cache_key()?;
    let ttl = req.expiration(state.default_ttl)?;

    let added = state.cache.add_value(key.as_str(), req.value, ttl)?;

    Ok(Json(AddResponse::new(key.as_str(), added)))
}

/// Handler for POST /cache/forever
pub async fn forever_handler(
    State(state): State<AppState>,
    Json(req): Json<ForeverRequest>,
) -> Result<Json<SetResponse>> {
    let key = req.cache_key()?;

    state.cache.forever(key.as_str(), &req.value)?;

    Ok(Json(SetResponse::new(key.as_str())))
}

/// Handler for POST /cache/get
pub async fn get_handler(
    State(state): State<AppState>,
    Json(req): Json<LookupRequest>,
) -> Result<Json<GetResponse>> {
    let key = req.cache_key()?;

    let value: Value = state.cache.get(key.as_str(), req.default)?;

    Ok(Json(GetResponse::new(key.as_str(), value)))
}

/// Handler for POST /cache/has
pub async fn has_handler(
    State(state): State<AppState>,
    Json(req): Json<KeyRequest>,
) -> Result<Json<HasResponse>> {
    let key = req.cache_key()?;

    let exists = state.cache.has(key.as_str())?;

    Ok(Json(HasResponse::new(key.as_str(), exists)))
}

/// Handler for POST /cache/pull
pub async fn pull_handler(
    State(state): State<AppState>,
    Json(req): Json<LookupRequest>,
) -> Result<Json<GetResponse>> {
    let key = req.cache_key()?;

    let value: Value = state.cache.pull(key.as_str(), req.default)?;

    Ok(Json(GetResponse::new(key.as_str(), value)))
}

/// Handler for POST /cache/delete and POST /cache/forget
///
/// Deleting an absent key succeeds.
pub async fn delete_handler(
    State(state): State<AppState>,
    Json(req): Json<KeyRequest>,
) -> Result<Json<DeleteResponse>> {
    let key = req.cache_key()?;

    state.cache.delete(key.as_str())?;

    Ok(Json(DeleteResponse::new(key.as_str())))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.store().stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
