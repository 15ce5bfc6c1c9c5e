//! API Routes
//!
//! Configures the Axum router with all storage endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_handler, dequeue_handler, enqueue_handler, get_handler, health_handler, peek_handler,
    queue_len_handler, remove_handler, set_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /kv/:key` - Store a value with optional TTL
/// - `GET /kv/:key` - Retrieve a value
/// - `DELETE /kv/:key` - Delete a key
/// - `POST /queues/:name` - Append to a queue
/// - `POST /queues/:name/dequeue` - Pop the queue head
/// - `GET /queues/:name/peek` - Read the queue head
/// - `DELETE /queues/:name/head` - Drop the queue head
/// - `GET /queues/:name/len` - Queue length
/// - `GET /stats` - Store size counters
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/kv/:key",
            put(set_handler).get(get_handler).delete(delete_handler),
        )
        .route("/queues/:name", post(enqueue_handler))
        .route("/queues/:name/dequeue", post(dequeue_handler))
        .route("/queues/:name/peek", get(peek_handler))
        .route("/queues/:name/head", delete(remove_handler))
        .route("/queues/:name/len", get(queue_len_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
