//! Response DTOs for the storage HTTP API
//!
//! Defines the structure of outgoing HTTP response bodies. They also derive
//! `Deserialize` so the remote backend can read them back.

use serde::{Deserialize, Serialize};

/// Response body for reading a key (GET /kv/:key)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: serde_json::Value,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(key: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for key mutations (PUT /kv/:key, DELETE /kv/:key)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyResponse {
    /// Success message
    pub message: String,
    /// The key that was written or deleted
    pub key: String,
}

impl KeyResponse {
    /// Creates a response for a stored key
    pub fn set(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }

    /// Creates a response for a deleted key
    pub fn deleted(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
        }
    }
}

/// Response body for dequeue and peek
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueValueResponse {
    /// The queue name
    pub queue: String,
    /// The head element
    pub value: serde_json::Value,
}

impl QueueValueResponse {
    pub fn new(queue: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            queue: queue.into(),
            value,
        }
    }
}

/// Response body for enqueue and queue length
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueLenResponse {
    pub queue: String,
    /// Number of elements, 0 for a queue that does not exist
    pub len: u64,
}

impl QueueLenResponse {
    pub fn new(queue: impl Into<String>, len: usize) -> Self {
        Self {
            queue: queue.into(),
            len: len as u64,
        }
    }
}

/// Response body for dropping a queue head (DELETE /queues/:name/head)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveResponse {
    pub queue: String,
    /// False if the queue was already empty
    pub removed: bool,
}

impl RemoveResponse {
    pub fn new(queue: impl Into<String>, removed: bool) -> Self {
        Self {
            queue: queue.into(),
            removed,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}
