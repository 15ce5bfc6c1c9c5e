//! Storage Module
//!
//! Generic key-value and queue storage with two backends:
//! - [`MemoryStore`]: in-process tables with TTL expiry and a background reaper
//! - [`RemoteStore`]: HTTP client for a `mini_store` server
//!
//! Both implement [`Storage`] and [`QueueStorage`], so callers can be
//! written once against the traits.

mod entry;
mod memory;
mod queue;
mod remote;
mod stats;
mod table;


use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

// Re-export public types
pub use entry::Entry;
pub use memory::MemoryStore;
pub use queue::QueueTable;
pub use remote::RemoteStore;
pub use stats::StoreStats;
pub use table::KvTable;

// == Storage Trait ==
/// Key-value capability shared by every backend.
///
/// A zero `ttl` stores the value without expiry.
#[async_trait]
pub trait Storage<T>: Send + Sync
where
    T: Send + 'static,
{
    /// Stores `value` under `key`, replacing any previous value and TTL.
    async fn set(&self, key: &str, value: T, ttl: Duration) -> Result<()>;

    /// Returns the value for `key`, or `None` if it is absent or expired.
    async fn get(&self, key: &str) -> Result<Option<T>>;

    /// Removes `key`. Removing an absent key succeeds.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Releases the backend. Safe to call more than once.
    async fn close(&self) -> Result<()>;
}

// == Queue Storage Trait ==
/// FIFO queue capability, layered on top of [`Storage`].
///
/// A queue with no elements does not exist; reads on it return `None`,
/// `false` or `0` rather than an error.
#[async_trait]
pub trait QueueStorage<T>: Storage<T>
where
    T: Send + 'static,
{
    /// Appends `value` to the tail of `queue`.
    async fn enqueue(&self, queue: &str, value: T) -> Result<()>;

    /// Removes and returns the head of `queue`.
    async fn dequeue(&self, queue: &str) -> Result<Option<T>>;

    /// Returns the head of `queue` without removing it.
    async fn peek(&self, queue: &str) -> Result<Option<T>>;

    /// Drops the head of `queue`. Returns false if the queue was empty.
    async fn remove(&self, queue: &str) -> Result<bool>;

    /// Number of elements in `queue`.
    async fn queue_len(&self, queue: &str) -> Result<u64>;
}
