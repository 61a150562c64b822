//! API Module
//!
//! HTTP handlers and routing exposing the cache facade as a JSON API.
//!
//! # Endpoints
//! - `POST /cache/set`, `POST /cache/put` - Store a value
//! - `POST /cache/add` - Store a value only if absent
//! - `POST /cache/forever` - Store a value without expiration
//! - `POST /cache/get` - Read a value or a default
//! - `POST /cache/has` - Check for an entry
//! - `POST /cache/pull` - Read a value and remove it
//! - `POST /cache/delete`, `POST /cache/forget` - Remove an entry
//! - `GET /stats` - Store statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
