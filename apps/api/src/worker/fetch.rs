//! The fetch interception pipeline.
//!
//! Policy branches on two axes: HTTP method and path prefix. Non-GET
//! requests pass through untouched; API GETs are network-first with cache
//! fallback; everything else is cache-first with no revalidation.

use async_trait::async_trait;
use axum::http::Method;
use tracing::debug;

use crate::worker::traits::{
    FetchError, FetchRequest, Fetcher, ResponseKind, StoredResponse,
};
use crate::worker::{OfflineWorker, API_PREFIX};

/// What the pipeline decided for one request.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchDecision {
    /// Not intercepted; the caller sends the request to the network itself.
    PassThrough,
    /// The pipeline produced a response (live or cached).
    Respond(StoredResponse),
}

impl OfflineWorker {
    /// Entry point for every intercepted request.
    pub async fn handle_fetch(&self, request: &FetchRequest) -> Result<FetchDecision, FetchError> {
        if request.method != Method::GET {
            return Ok(FetchDecision::PassThrough);
        }
        if request.path.starts_with(API_PREFIX) {
            self.network_first(request).await.map(FetchDecision::Respond)
        } else {
            self.cache_first(request).await.map(FetchDecision::Respond)
        }
    }

    /// Network-first: live response wins and refreshes the cache; the cache
    /// is consulted only when the network rejects.
    async fn network_first(&self, request: &FetchRequest) -> Result<StoredResponse, FetchError> {
        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if response.is_success() {
                    self.caches
                        .put(&self.cache_name, &request.path, response.clone())
                        .await;
                }
                Ok(response)
            }
            Err(e) => {
                debug!("Network rejected {}: {e}; trying cache", request.path);
                match self.caches.get(&self.cache_name, &request.path).await {
                    Some(cached) => Ok(cached),
                    None => Err(e),
                }
            }
        }
    }

    /// Cache-first: a cached response is returned unconditionally, with no
    /// revalidation. On a miss the network fills the cache (status 200 and
    /// non-error kind only).
    async fn cache_first(&self, request: &FetchRequest) -> Result<StoredResponse, FetchError> {
        if let Some(cached) = self.caches.get(&self.cache_name, &request.path).await {
            return Ok(cached);
        }
        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if response.status == 200 && response.kind != ResponseKind::Error {
                    self.caches
                        .put(&self.cache_name, &request.path, response.clone())
                        .await;
                }
                Ok(response)
            }
            Err(e) => {
                // Last-chance cache match; a miss propagates the failure.
                match self.caches.get(&self.cache_name, &request.path).await {
                    Some(cached) => Ok(cached),
                    None => Err(e),
                }
            }
        }
    }
}

/// Production network boundary: origin-relative paths resolved against a
/// base URL and fetched with reqwest.
pub struct HttpFetcher {
    base_url: String,
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<StoredResponse, FetchError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.client.request(request.method.clone(), &url);
        if let Some(body) = &request.body {
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body.clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(StoredResponse {
            status,
            content_type,
            body,
            kind: ResponseKind::Basic,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::worker::storage::{MemoryCaches, MemoryKv};
    use crate::worker::testing::{FakeFetcher, FakeWindows};
    use crate::worker::traits::CacheStorage;
    use crate::worker::CACHE_NAME;

    struct Rig {
        caches: Arc<MemoryCaches>,
        fetcher: Arc<FakeFetcher>,
        worker: OfflineWorker,
    }

    fn rig() -> Rig {
        let caches = Arc::new(MemoryCaches::new());
        let fetcher = Arc::new(FakeFetcher::new());
        let worker = OfflineWorker::new(
            Arc::clone(&caches) as Arc<dyn CacheStorage>,
            Arc::new(MemoryKv::new()),
            Arc::clone(&fetcher) as Arc<dyn Fetcher>,
            Arc::new(FakeWindows::default()),
        );
        Rig {
            caches,
            fetcher,
            worker,
        }
    }

    fn respond(decision: FetchDecision) -> StoredResponse {
        match decision {
            FetchDecision::Respond(response) => response,
            FetchDecision::PassThrough => panic!("expected a response, got pass-through"),
        }
    }

    #[tokio::test]
    async fn test_non_get_passes_through() {
        let rig = rig();
        let request = FetchRequest::post_json("/api/resume/save", "{}");
        let decision = rig.worker.handle_fetch(&request).await.unwrap();
        assert_eq!(decision, FetchDecision::PassThrough);
        assert!(rig.fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_cache_first_serves_cached_without_network() {
        let rig = rig();
        rig.caches
            .put(CACHE_NAME, "/index.html", StoredResponse::ok("text/html", "cached"))
            .await;

        let response = respond(
            rig.worker
                .handle_fetch(&FetchRequest::get("/index.html"))
                .await
                .unwrap(),
        );

        assert_eq!(response.body, bytes::Bytes::from("cached"));
        assert!(rig.fetcher.calls().is_empty(), "cache hit must not touch network");
    }

    #[tokio::test]
    async fn test_cache_first_populates_cache_on_miss() {
        let rig = rig();
        rig.fetcher.script(
            Method::GET,
            "/css/style.css",
            Ok(StoredResponse::ok("text/css", "body{}")),
        );

        let response = respond(
            rig.worker
                .handle_fetch(&FetchRequest::get("/css/style.css"))
                .await
                .unwrap(),
        );
        assert_eq!(response.status, 200);
        assert!(rig.caches.get(CACHE_NAME, "/css/style.css").await.is_some());

        // Second request is served from cache; no further script is needed.
        let again = respond(
            rig.worker
                .handle_fetch(&FetchRequest::get("/css/style.css"))
                .await
                .unwrap(),
        );
        assert_eq!(again.body, bytes::Bytes::from("body{}"));
        assert_eq!(rig.fetcher.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_cache_first_does_not_cache_non_200() {
        let rig = rig();
        rig.fetcher.script(
            Method::GET,
            "/missing.png",
            Ok(StoredResponse::ok("text/plain", "nope").with_status(404)),
        );

        let response = respond(
            rig.worker
                .handle_fetch(&FetchRequest::get("/missing.png"))
                .await
                .unwrap(),
        );
        assert_eq!(response.status, 404);
        assert!(rig.caches.get(CACHE_NAME, "/missing.png").await.is_none());
    }

    #[tokio::test]
    async fn test_cache_first_does_not_cache_error_kind() {
        let rig = rig();
        rig.fetcher.script(
            Method::GET,
            "/cross-origin.js",
            Ok(StoredResponse::ok("text/javascript", "x").with_kind(ResponseKind::Error)),
        );

        respond(
            rig.worker
                .handle_fetch(&FetchRequest::get("/cross-origin.js"))
                .await
                .unwrap(),
        );
        assert!(rig.caches.get(CACHE_NAME, "/cross-origin.js").await.is_none());
    }

    #[tokio::test]
    async fn test_cache_first_miss_and_network_failure_fails() {
        let rig = rig();
        rig.fetcher.script(
            Method::GET,
            "/offline.html",
            Err(FetchError::Network("offline".to_string())),
        );

        let err = rig
            .worker
            .handle_fetch(&FetchRequest::get("/offline.html"))
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::Network("offline".to_string()));
    }

    #[tokio::test]
    async fn test_network_first_attempts_network_and_caches_success() {
        let rig = rig();
        rig.fetcher.script(
            Method::GET,
            "/api/resume",
            Ok(StoredResponse::ok("application/json", r#"{"success":true}"#)),
        );

        let response = respond(
            rig.worker
                .handle_fetch(&FetchRequest::get("/api/resume"))
                .await
                .unwrap(),
        );
        assert_eq!(response.status, 200);
        assert_eq!(rig.fetcher.calls(), vec!["GET /api/resume".to_string()]);
        assert!(rig.caches.get(CACHE_NAME, "/api/resume").await.is_some());
    }

    #[tokio::test]
    async fn test_network_first_falls_back_to_cache_on_rejection() {
        let rig = rig();
        rig.caches
            .put(
                CACHE_NAME,
                "/api/resume",
                StoredResponse::ok("application/json", r#"{"data":[]}"#),
            )
            .await;
        rig.fetcher.script(
            Method::GET,
            "/api/resume",
            Err(FetchError::Network("offline".to_string())),
        );

        let response = respond(
            rig.worker
                .handle_fetch(&FetchRequest::get("/api/resume"))
                .await
                .unwrap(),
        );

        // Network was attempted first, fallback came from cache.
        assert_eq!(rig.fetcher.calls().len(), 1);
        assert_eq!(response.body, bytes::Bytes::from(r#"{"data":[]}"#));
    }

    #[tokio::test]
    async fn test_network_first_without_cached_fallback_fails() {
        let rig = rig();
        rig.fetcher.script(
            Method::GET,
            "/api/resume/1",
            Err(FetchError::Network("offline".to_string())),
        );

        let err = rig
            .worker
            .handle_fetch(&FetchRequest::get("/api/resume/1"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
    }

    #[tokio::test]
    async fn test_network_first_does_not_cache_failure_status() {
        let rig = rig();
        rig.fetcher.script(
            Method::GET,
            "/api/resume/404",
            Ok(StoredResponse::ok("application/json", "{}").with_status(404)),
        );

        let response = respond(
            rig.worker
                .handle_fetch(&FetchRequest::get("/api/resume/404"))
                .await
                .unwrap(),
        );
        assert_eq!(response.status, 404);
        assert!(rig.caches.get(CACHE_NAME, "/api/resume/404").await.is_none());
    }

    #[tokio::test]
    async fn test_http_fetcher_round_trips_against_live_server() {
        use tempfile::TempDir;

        use crate::config::Config;
        use crate::routes::build_router;
        use crate::state::AppState;
        use crate::store::FileStore;

        let dir = TempDir::new().unwrap();
        let config = Config {
            port: 0,
            data_dir: dir.path().join("data"),
            static_dir: dir.path().join("public"),
            dev_mode: false,
            rust_log: "info".to_string(),
        };
        let store = Arc::new(FileStore::open(&config.data_dir).await.unwrap());
        let app = build_router(AppState { store, config });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let fetcher = HttpFetcher::new(format!("http://{addr}"));

        let response = fetcher
            .fetch(&FetchRequest::get("/api/health"))
            .await
            .unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.content_type.as_deref(), Some("application/json"));
        let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(body["success"], serde_json::json!(true));

        // POST with a JSON body, as the replay path issues it.
        let response = fetcher
            .fetch(&FetchRequest::post_json("/api/resume/save", r#"{"name":"Ada"}"#))
            .await
            .unwrap();
        assert_eq!(response.status, 201);
        let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
        assert!(body["resumeId"].is_string());
    }
}
