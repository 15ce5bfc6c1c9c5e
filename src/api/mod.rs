//! API Module
//!
//! HTTP handlers and routing that expose a memory store of JSON values.
//! The remote backend is the client for these endpoints.
//!
//! # Endpoints
//! - `PUT|GET|DELETE /kv/:key` - Key-value operations
//! - `POST /queues/:name` - Enqueue
//! - `POST /queues/:name/dequeue`, `GET /queues/:name/peek`,
//!   `DELETE /queues/:name/head`, `GET /queues/:name/len` - Queue operations
//! - `GET /stats` - Store size counters
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
