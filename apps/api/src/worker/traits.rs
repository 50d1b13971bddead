//! Injected seams for the offline cache layer.

use async_trait::async_trait;
use axum::http::Method;
use bytes::Bytes;
use thiserror::Error;

/// How a response was obtained. `Error`-kind responses are never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Basic,
    Opaque,
    Error,
}

/// A response snapshot: storable in a cache, returnable to a client later.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
    pub kind: ResponseKind,
}

impl StoredResponse {
    pub fn ok(content_type: &str, body: impl Into<Bytes>) -> Self {
        StoredResponse {
            status: 200,
            content_type: Some(content_type.to_string()),
            body: body.into(),
            kind: ResponseKind::Basic,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn with_kind(mut self, kind: ResponseKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A request as seen by the interception pipeline. Paths are origin-relative.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Bytes>,
}

impl FetchRequest {
    pub fn get(path: impl Into<String>) -> Self {
        FetchRequest {
            method: Method::GET,
            path: path.into(),
            body: None,
        }
    }

    pub fn post_json(path: impl Into<String>, body: impl Into<Bytes>) -> Self {
        FetchRequest {
            method: Method::POST,
            path: path.into(),
            body: Some(body.into()),
        }
    }
}

/// Network rejection (offline, DNS failure, connection refused). HTTP error
/// statuses are *not* fetch errors; they arrive as `StoredResponse`s.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
}

/// The network boundary. Production: `HttpFetcher` over reqwest.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<StoredResponse, FetchError>;
}

/// Named caches of URL-keyed response snapshots.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    async fn put(&self, cache: &str, url: &str, response: StoredResponse);
    async fn get(&self, cache: &str, url: &str) -> Option<StoredResponse>;
    /// Names of every cache currently held, for activation-time pruning.
    async fn cache_names(&self) -> Vec<String>;
    /// Deletes a whole cache; returns whether it existed.
    async fn delete_cache(&self, cache: &str) -> bool;
}

/// String key-value storage backing the pending-write queue.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: String);
}

/// An open window known to the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowClient {
    pub id: String,
    pub url: String,
}

/// Window-type client registry used by notification-click handling.
#[async_trait]
pub trait WindowClients: Send + Sync {
    async fn list(&self) -> Vec<WindowClient>;
    /// Attempts to focus the window; returns whether focusing succeeded.
    async fn focus(&self, id: &str) -> bool;
    async fn open(&self, url: &str);
}
