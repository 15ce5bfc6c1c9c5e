//! Memory Store Module
//!
//! In-process backend combining the key-value table, the queue table and the
//! expiry reaper behind one handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::error::{Result, StorageError};
use crate::storage::{KvTable, QueueStorage, QueueTable, Storage, StoreStats};
use crate::tasks::spawn_reaper;

// == Memory Store ==
/// Thread-safe in-memory store with TTL expiry and named FIFO queues.
///
/// The key-value table and the queue table sit behind independent locks, so
/// queue traffic never contends with key-value traffic. The operations below
/// are synchronous; the same operations are available asynchronously through
/// [`Storage`] and [`QueueStorage`] for code written against either backend.
///
/// After [`close`](Self::close) every data operation returns
/// [`StorageError::Closed`]. Dropping the store without closing it also stops
/// the reaper.
#[derive(Debug)]
pub struct MemoryStore<T> {
    items: Arc<KvTable<T>>,
    queues: QueueTable<T>,
    shutdown: watch::Sender<bool>,
    reaper: Mutex<Option<JoinHandle<()>>>,
    closed: AtomicBool,
}

impl<T> MemoryStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a store and starts its reaper.
    ///
    /// # Arguments
    /// * `cleanup_interval` - Time between reaper sweeps, must be non-zero
    ///
    /// # Errors
    /// Returns [`StorageError::InvalidConfig`] for a zero interval or when
    /// called outside a Tokio runtime.
    pub fn new(cleanup_interval: Duration) -> Result<Self> {
        if cleanup_interval.is_zero() {
            return Err(StorageError::InvalidConfig(
                "cleanup interval must be greater than zero".to_string(),
            ));
        }

        if tokio::runtime::Handle::try_current().is_err() {
            return Err(StorageError::InvalidConfig(
                "memory store must be created inside a Tokio runtime".to_string(),
            ));
        }

        let items = Arc::new(KvTable::new());
        let (shutdown, shutdown_rx) = watch::channel(false);
        let reaper = spawn_reaper(Arc::downgrade(&items), cleanup_interval, shutdown_rx);

        info!(
            cleanup_interval_ms = cleanup_interval.as_millis() as u64,
            "Memory store created"
        );

        Ok(Self {
            items,
            queues: QueueTable::new(),
            shutdown,
            reaper: Mutex::new(Some(reaper)),
            closed: AtomicBool::new(false),
        })
    }

    // == Set ==
    /// Stores a value. A zero `ttl` means the entry never expires.
    pub fn set(&self, key: &str, value: T, ttl: Duration) -> Result<()> {
        self.ensure_open()?;
        self.items.set(key.to_string(), value, ttl);
        Ok(())
    }

    // == Get ==
    /// Returns the value if present and not expired.
    pub fn get(&self, key: &str) -> Result<Option<T>> {
        self.ensure_open()?;
        Ok(self.items.get(key))
    }

    // == Delete ==
    pub fn delete(&self, key: &str) -> Result<()> {
        self.ensure_open()?;
        self.items.delete(key);
        Ok(())
    }

    // == Enqueue ==
    /// Appends to the tail of `queue`, returning the new length.
    pub fn enqueue(&self, queue: &str, value: T) -> Result<usize> {
        self.ensure_open()?;
        Ok(self.queues.push(queue, value))
    }

    // == Dequeue ==
    pub fn dequeue(&self, queue: &str) -> Result<Option<T>> {
        self.ensure_open()?;
        Ok(self.queues.pop(queue))
    }

    // == Peek ==
    pub fn peek(&self, queue: &str) -> Result<Option<T>> {
        self.ensure_open()?;
        Ok(self.queues.peek(queue))
    }

    // == Remove ==
    /// Drops the head of `queue`. Returns false if the queue was empty.
    pub fn remove(&self, queue: &str) -> Result<bool> {
        self.ensure_open()?;
        Ok(self.queues.remove(queue))
    }

    // == Queue Length ==
    pub fn queue_len(&self, queue: &str) -> Result<usize> {
        self.ensure_open()?;
        Ok(self.queues.len(queue))
    }

    // == Stats ==
    /// Returns a snapshot of the store's size. Available after close.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            entries: self.items.len(),
            queues: self.queues.queue_count(),
            queued_items: self.queues.item_count(),
            purged: self.items.purged(),
        }
    }

    // == Close ==
    /// Stops the reaper and waits for it to exit.
    ///
    /// Idempotent: every call, including concurrent ones, returns `Ok(())`
    /// only once the reaper has exited. Operations already in progress
    /// complete normally.
    pub async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        self.shutdown.send_replace(true);

        // Held across the join so concurrent callers wait for the same exit
        let mut reaper = self.reaper.lock().await;
        if let Some(handle) = reaper.take() {
            if let Err(err) = handle.await {
                warn!(error = %err, "Expiry reaper exited abnormally");
            }
            info!("Memory store closed");
        }

        Ok(())
    }

    /// Returns true once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            Err(StorageError::Closed)
        } else {
            Ok(())
        }
    }
}

// == Trait Implementations ==
#[async_trait]
impl<T> Storage<T> for MemoryStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn set(&self, key: &str, value: T, ttl: Duration) -> Result<()> {
        MemoryStore::set(self, key, value, ttl)
    }

    async fn get(&self, key: &str) -> Result<Option<T>> {
        MemoryStore::get(self, key)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        MemoryStore::delete(self, key)
    }

    async fn close(&self) -> Result<()> {
        MemoryStore::close(self).await
    }
}

#[async_trait]
impl<T> QueueStorage<T> for MemoryStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn enqueue(&self, queue: &str, value: T) -> Result<()> {
        MemoryStore::enqueue(self, queue, value).map(|_| ())
    }

    async fn dequeue(&self, queue: &str) -> Result<Option<T>> {
        MemoryStore::dequeue(self, queue)
    }

    async fn peek(&self, queue: &str) -> Result<Option<T>> {
        MemoryStore::peek(self, queue)
    }

    async fn remove(&self, queue: &str) -> Result<bool> {
        MemoryStore::remove(self, queue)
    }

    async fn queue_len(&self, queue: &str) -> Result<u64> {
        MemoryStore::queue_len(self, queue).map(|len| len as u64)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const LONG_INTERVAL: Duration = Duration::from_secs(3600);

    #[tokio::test]
    async fn test_set_get_delete() {
        let store = MemoryStore::new(Duration::from_millis(50)).unwrap();

        store.set("foo", "bar".to_string(), Duration::ZERO).unwrap();
        assert_eq!(store.get("foo").unwrap(), Some("bar".to_string()));

        store.delete("foo").unwrap();
        assert_eq!(store.get("foo").unwrap(), None);

        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_get_unknown_key() {
        let store: MemoryStore<i32> = MemoryStore::new(LONG_INTERVAL).unwrap();

        assert_eq!(store.get("never-set").unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_unknown_key_succeeds() {
        let store: MemoryStore<i32> = MemoryStore::new(LONG_INTERVAL).unwrap();

        assert!(store.delete("never-set").is_ok());
    }

    #[tokio::test]
    async fn test_struct_values() {
        #[derive(Debug, Clone, PartialEq)]
        struct Person {
            name: String,
            age: u32,
        }

        let store = MemoryStore::new(LONG_INTERVAL).unwrap();
        let bob = Person {
            name: "Bob".to_string(),
            age: 30,
        };

        store.set("struct", bob.clone(), Duration::ZERO).unwrap();
        assert_eq!(store.get("struct").unwrap(), Some(bob));
    }

    #[tokio::test]
    async fn test_lazy_expiry_before_sweep() {
        // Reaper will not run during this test
        let store = MemoryStore::new(LONG_INTERVAL).unwrap();

        store.set("temp", "value", Duration::from_millis(20)).unwrap();
        assert_eq!(store.get("temp").unwrap(), Some("value"));

        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(store.get("temp").unwrap(), None);
        assert_eq!(store.stats().entries, 1, "read must not delete");
    }

    #[tokio::test]
    async fn test_reaper_physically_removes_expired() {
        let store = MemoryStore::new(Duration::from_millis(10)).unwrap();

        store.set("temp", 1u8, Duration::from_millis(20)).unwrap();
        store.set("keep", 2u8, Duration::ZERO).unwrap();

        tokio::time::sleep(Duration::from_millis(150)).await;

        let stats = store.stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.purged, 1);
        assert_eq!(store.get("keep").unwrap(), Some(2));
    }

    #[tokio::test]
    async fn test_queue_operations() {
        let store = MemoryStore::new(LONG_INTERVAL).unwrap();

        assert_eq!(store.enqueue("jobs", "a").unwrap(), 1);
        assert_eq!(store.enqueue("jobs", "b").unwrap(), 2);
        assert_eq!(store.enqueue("jobs", "c").unwrap(), 3);

        assert_eq!(store.peek("jobs").unwrap(), Some("a"));
        assert_eq!(store.queue_len("jobs").unwrap(), 3);

        assert_eq!(store.dequeue("jobs").unwrap(), Some("a"));
        assert!(store.remove("jobs").unwrap());
        assert_eq!(store.dequeue("jobs").unwrap(), Some("c"));

        assert_eq!(store.dequeue("jobs").unwrap(), None);
        assert!(!store.remove("jobs").unwrap());
        assert_eq!(store.queue_len("jobs").unwrap(), 0);
        assert_eq!(store.stats().queues, 0);
    }

    #[tokio::test]
    async fn test_queue_and_kv_namespaces_are_separate() {
        let store = MemoryStore::new(LONG_INTERVAL).unwrap();

        store.set("shared", 1, Duration::ZERO).unwrap();
        store.enqueue("shared", 2).unwrap();

        assert_eq!(store.get("shared").unwrap(), Some(1));
        assert_eq!(store.peek("shared").unwrap(), Some(2));

        store.delete("shared").unwrap();
        assert_eq!(store.queue_len("shared").unwrap(), 1);
    }

    #[tokio::test]
    async fn test_zero_interval_rejected() {
        let result: Result<MemoryStore<u8>> = MemoryStore::new(Duration::ZERO);

        assert!(matches!(result, Err(StorageError::InvalidConfig(_))));
    }

    #[test]
    fn test_new_outside_runtime_rejected() {
        let result: Result<MemoryStore<u8>> = MemoryStore::new(LONG_INTERVAL);

        assert!(matches!(result, Err(StorageError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let store: MemoryStore<u8> = MemoryStore::new(Duration::from_millis(10)).unwrap();

        assert!(store.close().await.is_ok());
        assert!(store.close().await.is_ok());
        assert!(store.is_closed());
    }

    #[tokio::test]
    async fn test_concurrent_close_waits_for_reaper() {
        let store: MemoryStore<u8> = MemoryStore::new(LONG_INTERVAL).unwrap();

        let store = &store;
        let close_and_count = || async move {
            let result = store.close().await;
            (result, store.shutdown.receiver_count())
        };
        let ((first, first_live), (second, second_live)) =
            tokio::join!(close_and_count(), close_and_count());

        assert!(first.is_ok());
        assert!(second.is_ok());
        assert_eq!(first_live, 0, "reaper still running after close");
        assert_eq!(second_live, 0, "reaper still running after close");
    }

    #[tokio::test]
    async fn test_max_ttl_does_not_panic() {
        let store = MemoryStore::new(LONG_INTERVAL).unwrap();

        store.set("k", 1, Duration::MAX).unwrap();

        assert_eq!(store.get("k").unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_operations_after_close_fail() {
        let store = MemoryStore::new(LONG_INTERVAL).unwrap();
        store.set("k", 1, Duration::ZERO).unwrap();
        store.enqueue("q", 1).unwrap();

        store.close().await.unwrap();

        assert!(matches!(store.set("k", 2, Duration::ZERO), Err(StorageError::Closed)));
        assert!(matches!(store.get("k"), Err(StorageError::Closed)));
        assert!(matches!(store.delete("k"), Err(StorageError::Closed)));
        assert!(matches!(store.enqueue("q", 2), Err(StorageError::Closed)));
        assert!(matches!(store.dequeue("q"), Err(StorageError::Closed)));
        assert!(matches!(store.peek("q"), Err(StorageError::Closed)));
        assert!(matches!(store.remove("q"), Err(StorageError::Closed)));
        assert!(matches!(store.queue_len("q"), Err(StorageError::Closed)));

        // Stats remain readable
        assert_eq!(store.stats().entries, 1);
    }

    #[tokio::test]
    async fn test_no_sweeps_after_close() {
        let store = MemoryStore::new(Duration::from_millis(10)).unwrap();
        store.close().await.unwrap();

        // Written directly to the table so the closed flag does not interfere
        store.items.set("temp".to_string(), 1, Duration::from_millis(5));
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(store.stats().entries, 1);
        assert_eq!(store.stats().purged, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_set_get_same_key() {
        let store = Arc::new(MemoryStore::new(Duration::from_secs(1)).unwrap());
        let key = "concurrent";

        let mut handles = Vec::with_capacity(100);
        for i in 0..100i64 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.set(key, i, Duration::ZERO).unwrap();
                store.get(key).unwrap()
            }));
        }

        for handle in handles {
            let value = handle.await.unwrap().expect("value should be present");
            assert!((0..100).contains(&value), "torn or foreign value: {value}");
        }

        store.close().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_enqueue_dequeue() {
        let store = Arc::new(MemoryStore::new(LONG_INTERVAL).unwrap());

        let producers: Vec<_> = (0..4)
            .map(|p| {
                let store = store.clone();
                tokio::spawn(async move {
                    for i in 0..50 {
                        store.enqueue("work", p * 1000 + i).unwrap();
                    }
                })
            })
            .collect();
        for producer in producers {
            producer.await.unwrap();
        }
        assert_eq!(store.queue_len("work").unwrap(), 200);

        let consumers: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    let mut seen = Vec::new();
                    while let Some(value) = store.dequeue("work").unwrap() {
                        seen.push(value);
                    }
                    seen
                })
            })
            .collect();

        let mut all = HashSet::new();
        for consumer in consumers {
            for value in consumer.await.unwrap() {
                assert!(all.insert(value), "value {value} delivered twice");
            }
        }

        assert_eq!(all.len(), 200);
        assert_eq!(store.stats().queues, 0);
    }

    #[tokio::test]
    async fn test_trait_object_usage() {
        let store: Box<dyn QueueStorage<String>> =
            Box::new(MemoryStore::new(LONG_INTERVAL).unwrap());

        store.set("k", "v".to_string(), Duration::ZERO).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));

        store.enqueue("q", "x".to_string()).await.unwrap();
        assert_eq!(store.queue_len("q").await.unwrap(), 1);
        assert_eq!(store.dequeue("q").await.unwrap(), Some("x".to_string()));

        store.close().await.unwrap();
        assert!(matches!(store.get("k").await, Err(StorageError::Closed)));
    }
}
