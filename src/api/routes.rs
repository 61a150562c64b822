//! API Routes
//!
//! Configures the Axum router with all cache endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    add_handler, delete_handler, forever_handler, get_handler, has_handler, health_handler,
    pull_handler, set_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// `put` and `forget` are routed to the same handlers as `set` and `delete`.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let cache_routes = Router::new()
        .route("/set", post(set_handler))
        .route("/put", post(set_handler))
        .route("/add", post(add_handler))
        .route("/forever", post(forever_handler))
        .route("/get", post(get_handler))
        .route("/has", post(has_handler))
        .route("/pull", post(pull_handler))
        .route("/delete", post(delete_handler))
        .route("/forget", post(delete_handler));

    Router::new()
        .nest("/cache", cache_routes)
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
