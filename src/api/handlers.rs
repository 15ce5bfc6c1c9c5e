//! API Handlers
//!
//! HTTP request handlers for the key-value and queue endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::config::Config;
use crate::error::{Result, StorageError};
use crate::models::{
    validate_name, EnqueueRequest, GetResponse, HealthResponse, KeyResponse, QueueLenResponse,
    QueueValueResponse, RemoveResponse, SetRequest,
};
use crate::storage::{MemoryStore, StoreStats};

/// Application state shared across all handlers.
///
/// The store does its own locking, so handlers share it through a plain Arc.
#[derive(Clone)]
pub struct AppState {
    /// Store holding arbitrary JSON values
    pub store: Arc<MemoryStore<Value>>,
}

impl AppState {
    /// Creates a new AppState around an existing store.
    pub fn new(store: MemoryStore<Value>) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Must be called inside a Tokio runtime, since the store starts its reaper.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = MemoryStore::new(config.cleanup_interval())?;
        Ok(Self::new(store))
    }
}

/// Handler for PUT /kv/:key
///
/// Stores a JSON value with optional TTL.
pub async fn set_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<SetRequest>,
) -> Result<Json<KeyResponse>> {
    validate_name("Key", &key)?;

    let ttl = req.ttl();
    state.store.set(&key, req.value, ttl)?;

    Ok(Json(KeyResponse::set(key)))
}

/// Handler for GET /kv/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    validate_name("Key", &key)?;

    match state.store.get(&key)? {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(StorageError::NotFound(format!("Key not found: {}", key))),
    }
}

/// Handler for DELETE /kv/:key
///
/// Deleting an absent key succeeds.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<KeyResponse>> {
    validate_name("Key", &key)?;

    state.store.delete(&key)?;

    Ok(Json(KeyResponse::deleted(key)))
}

/// Handler for POST /queues/:name
///
/// Appends to the queue and reports its new length.
pub async fn enqueue_handler(
    State(state): State<AppState>,
    Path(queue): Path<String>,
    Json(req): Json<EnqueueRequest>,
) -> Result<Json<QueueLenResponse>> {
    validate_name("Queue name", &queue)?;

    let len = state.store.enqueue(&queue, req.value)?;

    Ok(Json(QueueLenResponse::new(queue, len)))
}

/// Handler for POST /queues/:name/dequeue
pub async fn dequeue_handler(
    State(state): State<AppState>,
    Path(queue): Path<String>,
) -> Result<Json<QueueValueResponse>> {
    validate_name("Queue name", &queue)?;

    match state.store.dequeue(&queue)? {
        Some(value) => Ok(Json(QueueValueResponse::new(queue, value))),
        None => Err(StorageError::NotFound(format!("Queue is empty: {}", queue))),
    }
}

/// Handler for GET /queues/:name/peek
pub async fn peek_handler(
    State(state): State<AppState>,
    Path(queue): Path<String>,
) -> Result<Json<QueueValueResponse>> {
    validate_name("Queue name", &queue)?;

    match state.store.peek(&queue)? {
        Some(value) => Ok(Json(QueueValueResponse::new(queue, value))),
        None => Err(StorageError::NotFound(format!("Queue is empty: {}", queue))),
    }
}

/// Handler for DELETE /queues/:name/head
///
/// An empty queue answers 200 with `removed: false`.
pub async fn remove_handler(
    State(state): State<AppState>,
    Path(queue): Path<String>,
) -> Result<Json<RemoveResponse>> {
    validate_name("Queue name", &queue)?;

    let removed = state.store.remove(&queue)?;

    Ok(Json(RemoveResponse::new(queue, removed)))
}

/// Handler for GET /queues/:name/len
pub async fn queue_len_handler(
    State(state): State<AppState>,
    Path(queue): Path<String>,
) -> Result<Json<QueueLenResponse>> {
    validate_name("Queue name", &queue)?;

    let len = state.store.queue_len(&queue)?;

    Ok(Json(QueueLenResponse::new(queue, len)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StoreStats> {
    Json(state.store.stats())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
