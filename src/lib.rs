//! Mini Store - Generic key-value and queue storage
//!
//! Provides an in-memory backend with TTL expiry and a background reaper,
//! plus an HTTP server and a remote client backend sharing the same traits.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod tasks;

pub use api::AppState;
pub use config::{Config, RemoteConfig};
pub use error::{Result, StorageError};
pub use storage::{MemoryStore, QueueStorage, RemoteStore, Storage, StoreStats};
