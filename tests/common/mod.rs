//! Shared helpers for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mini_store::{api::create_router, AppState, MemoryStore, QueueStorage};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Starts a server on an ephemeral port and returns its address.
pub async fn spawn_server() -> (SocketAddr, Arc<MemoryStore<Value>>, JoinHandle<()>) {
    let store = MemoryStore::new(Duration::from_millis(20)).unwrap();
    let state = AppState::new(store);
    let store = state.store.clone();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        axum::serve(listener, create_router(state)).await.unwrap();
    });

    (addr, store, handle)
}

/// Exercises the behavior every backend must share.
///
/// `prefix` keeps runs against the same server apart.
pub async fn run_conformance<S>(store: &S, prefix: &str)
where
    S: QueueStorage<String>,
{
    let key = |name: &str| format!("{prefix}-{name}");

    // Unknown keys
    assert_eq!(store.get(&key("never-set")).await.unwrap(), None);

    // Set / get / delete
    store.set(&key("foo"), "bar".to_string(), Duration::ZERO).await.unwrap();
    assert_eq!(store.get(&key("foo")).await.unwrap(), Some("bar".to_string()));
    store.delete(&key("foo")).await.unwrap();
    assert_eq!(store.get(&key("foo")).await.unwrap(), None);
    store.delete(&key("foo")).await.unwrap();

    // Overwrite
    store.set(&key("k"), "v1".to_string(), Duration::ZERO).await.unwrap();
    store.set(&key("k"), "v2".to_string(), Duration::ZERO).await.unwrap();
    assert_eq!(store.get(&key("k")).await.unwrap(), Some("v2".to_string()));

    // TTL
    store
        .set(&key("temp"), "value".to_string(), Duration::from_millis(50))
        .await
        .unwrap();
    assert_eq!(store.get(&key("temp")).await.unwrap(), Some("value".to_string()));
    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(store.get(&key("temp")).await.unwrap(), None);

    // FIFO
    let queue = key("queue");
    for value in ["v1", "v2", "v3"] {
        store.enqueue(&queue, value.to_string()).await.unwrap();
    }
    assert_eq!(store.queue_len(&queue).await.unwrap(), 3);
    assert_eq!(store.peek(&queue).await.unwrap(), Some("v1".to_string()));
    assert_eq!(store.peek(&queue).await.unwrap(), Some("v1".to_string()));
    assert_eq!(store.queue_len(&queue).await.unwrap(), 3);

    assert_eq!(store.dequeue(&queue).await.unwrap(), Some("v1".to_string()));
    assert!(store.remove(&queue).await.unwrap());
    assert_eq!(store.dequeue(&queue).await.unwrap(), Some("v3".to_string()));

    // Drained queues behave as nonexistent
    assert_eq!(store.dequeue(&queue).await.unwrap(), None);
    assert_eq!(store.peek(&queue).await.unwrap(), None);
    assert!(!store.remove(&queue).await.unwrap());
    assert_eq!(store.queue_len(&queue).await.unwrap(), 0);

    store.enqueue(&queue, "fresh".to_string()).await.unwrap();
    assert_eq!(store.queue_len(&queue).await.unwrap(), 1);
    assert_eq!(store.dequeue(&queue).await.unwrap(), Some("fresh".to_string()));
}
