//! Request DTOs for the storage HTTP API
//!
//! Defines the structure of incoming HTTP request bodies. The remote backend
//! serializes the same types on the client side.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StorageError};

/// Request body for storing a key (PUT /kv/:key)
///
/// # Fields
/// - `value`: Any JSON value
/// - `ttl_ms`: Optional TTL in milliseconds; absent or 0 means no expiry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetRequest {
    /// The value to store
    pub value: serde_json::Value,
    /// Optional TTL in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_ms: Option<u64>,
}

impl SetRequest {
    /// Builds a request from a storage-level TTL.
    ///
    /// Sub-millisecond TTLs round up to 1ms so they are not mistaken for
    /// "no expiry".
    pub fn new(value: serde_json::Value, ttl: Duration) -> Self {
        let ttl_ms = if ttl.is_zero() {
            None
        } else {
            Some(u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1))
        };

        Self { value, ttl_ms }
    }

    /// TTL as a duration, `Duration::ZERO` when none was given.
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms.unwrap_or(0))
    }
}

/// Request body for appending to a queue (POST /queues/:name)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnqueueRequest {
    /// The value to append
    pub value: serde_json::Value,
}

/// Validates a key or queue name before it reaches the store.
pub fn validate_name(kind: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(StorageError::InvalidRequest(format!("{kind} cannot be empty")));
    }
    Ok(())
}
