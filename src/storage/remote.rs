//! Remote Store Module
//!
//! Networked backend: forwards every operation to a `mini_store` HTTP server.
//! Values travel as JSON; each call is bounded by the configured timeout.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::RemoteConfig;
use crate::error::{Result, StorageError};
use crate::models::{
    validate_name, EnqueueRequest, ErrorResponse, QueueLenResponse, RemoveResponse, SetRequest,
};
use crate::storage::{QueueStorage, Storage};

// == Remote Store ==
/// HTTP client for a `mini_store` server, implementing the same traits as
/// [`MemoryStore`](crate::storage::MemoryStore).
///
/// Connectivity failures surface as [`StorageError::Backend`] and deadline
/// overruns as [`StorageError::Timeout`]; both are retriable.
#[derive(Debug)]
pub struct RemoteStore<T> {
    client: Client,
    base_url: Url,
    timeout: Duration,
    closed: AtomicBool,
    _value: PhantomData<fn() -> T>,
}

impl<T> RemoteStore<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a client without contacting the server.
    ///
    /// # Errors
    /// Returns [`StorageError::InvalidConfig`] if the base URL is not an
    /// http(s) URL or the timeout is zero.
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            StorageError::InvalidConfig(format!("invalid base URL '{}': {}", config.base_url, e))
        })?;

        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(StorageError::InvalidConfig(format!(
                "base URL '{}' must be an http(s) URL",
                config.base_url
            )));
        }

        if config.timeout.is_zero() {
            return Err(StorageError::InvalidConfig(
                "request timeout must be greater than zero".to_string(),
            ));
        }

        let client = Client::builder()
            .build()
            .map_err(|e| StorageError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            timeout: config.timeout,
            closed: AtomicBool::new(false),
            _value: PhantomData,
        })
    }

    // == Connect ==
    /// Creates a client and checks that the server answers its health probe.
    pub async fn connect(config: RemoteConfig) -> Result<Self> {
        let store = Self::new(config)?;
        store.ping().await?;
        info!(url = %store.base_url, "Connected to remote store");
        Ok(store)
    }

    // == Ping ==
    /// Calls `GET /health` on the server.
    pub async fn ping(&self) -> Result<()> {
        let url = self.url(&["health"])?;
        self.call(async {
            check_status(self.client.get(url).send().await?).await?;
            Ok(())
        })
        .await
    }

    /// Builds an endpoint URL, percent-encoding each segment.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                StorageError::InvalidConfig(format!("{} cannot be a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Runs one remote call under the per-call timeout.
    async fn call<R, F>(&self, fut: F) -> Result<R>
    where
        F: Future<Output = Result<R>>,
    {
        if self.closed.load(Ordering::SeqCst) {
            return Err(StorageError::Closed);
        }

        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                warn!(error = %err, "Remote store call failed");
                Err(err)
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Remote store call timed out"
                );
                Err(StorageError::Timeout(self.timeout))
            }
        }
    }

    /// Sends a request whose success body carries a `value`.
    ///
    /// Only a 404 answered by a store handler maps to `None`; a 404 without
    /// an error body means the route itself was not found.
    async fn fetch_value(&self, request: RequestBuilder) -> Result<Option<T>> {
        self.call(async {
            let response = request.send().await?;
            if response.status() == StatusCode::NOT_FOUND {
                let url = response.url().clone();
                let body = response.bytes().await?;
                return match serde_json::from_slice::<ErrorResponse>(&body) {
                    Ok(_) => Ok(None),
                    Err(_) => Err(StorageError::Backend(format!("no store route at {url}"))),
                };
            }

            let body: ValueBody = check_status(response).await?.json().await?;
            Ok(Some(serde_json::from_value(body.value)?))
        })
        .await
    }
}

/// Shared shape of `GetResponse` and `QueueValueResponse`: only `value` is read.
#[derive(Deserialize)]
struct ValueBody {
    value: serde_json::Value,
}

/// Turns non-success statuses into errors. 400 keeps the server's message.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<ErrorResponse>().await {
        Ok(body) => body.error,
        Err(_) => status.canonical_reason().unwrap_or("unknown").to_string(),
    };

    if status == StatusCode::BAD_REQUEST {
        Err(StorageError::InvalidRequest(message))
    } else {
        Err(StorageError::Backend(format!("server returned {status}: {message}")))
    }
}

// == Trait Implementations ==
#[async_trait]
impl<T> Storage<T> for RemoteStore<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn set(&self, key: &str, value: T, ttl: Duration) -> Result<()> {
        validate_name("Key", key)?;
        let body = SetRequest::new(serde_json::to_value(&value)?, ttl);
        let url = self.url(&["kv", key])?;

        self.call(async {
            check_status(self.client.put(url).json(&body).send().await?).await?;
            Ok(())
        })
        .await
    }

    async fn get(&self, key: &str) -> Result<Option<T>> {
        validate_name("Key", key)?;
        let url = self.url(&["kv", key])?;
        self.fetch_value(self.client.get(url)).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        validate_name("Key", key)?;
        let url = self.url(&["kv", key])?;

        self.call(async {
            check_status(self.client.delete(url).send().await?).await?;
            Ok(())
        })
        .await
    }

    /// Marks the client closed. Pooled connections are released when the
    /// store is dropped.
    async fn close(&self) -> Result<()> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            info!(url = %self.base_url, "Remote store closed");
        }
        Ok(())
    }
}

#[async_trait]
impl<T> QueueStorage<T> for RemoteStore<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn enqueue(&self, queue: &str, value: T) -> Result<()> {
        validate_name("Queue name", queue)?;
        let body = EnqueueRequest {
            value: serde_json::to_value(&value)?,
        };
        let url = self.url(&["queues", queue])?;

        self.call(async {
            check_status(self.client.post(url).json(&body).send().await?).await?;
            Ok(())
        })
        .await
    }

    async fn dequeue(&self, queue: &str) -> Result<Option<T>> {
        validate_name("Queue name", queue)?;
        let url = self.url(&["queues", queue, "dequeue"])?;
        self.fetch_value(self.client.post(url)).await
    }

    async fn peek(&self, queue: &str) -> Result<Option<T>> {
        validate_name("Queue name", queue)?;
        let url = self.url(&["queues", queue, "peek"])?;
        self.fetch_value(self.client.get(url)).await
    }

    async fn remove(&self, queue: &str) -> Result<bool> {
        validate_name("Queue name", queue)?;
        let url = self.url(&["queues", queue, "head"])?;

        self.call(async {
            let response = check_status(self.client.delete(url).send().await?).await?;
            let body: RemoveResponse = response.json().await?;
            Ok(body.removed)
        })
        .await
    }

    async fn queue_len(&self, queue: &str) -> Result<u64> {
        validate_name("Queue name", queue)?;
        let url = self.url(&["queues", queue, "len"])?;

        self.call(async {
            let response = check_status(self.client.get(url).send().await?).await?;
            let body: QueueLenResponse = response.json().await?;
            Ok(body.len)
        })
        .await
    }
}
