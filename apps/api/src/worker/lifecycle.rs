//! Worker lifecycle: install-time pre-caching, activation-time pruning, and
//! the `Installing → Waiting → Active` phase machine.

use tracing::{info, warn};

use crate::worker::traits::FetchRequest;
use crate::worker::OfflineWorker;

/// Lifecycle phase of one worker instance. A newly deployed version starts
/// its own instance in `Installing` while the previous one stays `Active`
/// until it has no remaining clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerPhase {
    Installing,
    Waiting,
    Active,
}

impl OfflineWorker {
    pub fn phase(&self) -> WorkerPhase {
        *self.phase.lock().expect("phase lock poisoned")
    }

    fn set_phase(&self, phase: WorkerPhase) {
        *self.phase.lock().expect("phase lock poisoned") = phase;
    }

    /// Pre-caches the static manifest into the version-named cache.
    ///
    /// Best-effort: an unreachable asset is logged and skipped, never failing
    /// the install. Skip-waiting semantics: readiness is signaled immediately
    /// (the caller may activate without waiting for the old instance).
    pub async fn install(&self) {
        for url in &self.manifest {
            match self.fetcher.fetch(&FetchRequest::get(url.clone())).await {
                Ok(response) => {
                    self.caches.put(&self.cache_name, url, response).await;
                }
                Err(e) => {
                    warn!("Skipping pre-cache of {url}: {e}");
                }
            }
        }
        info!("Worker installed (cache {})", self.cache_name);
        self.set_phase(WorkerPhase::Waiting);
    }

    /// Deletes every cache not matching the current version name and claims
    /// already-open clients immediately.
    pub async fn activate(&self) {
        for name in self.caches.cache_names().await {
            if name != self.cache_name {
                self.caches.delete_cache(&name).await;
                info!("Pruned stale cache {name}");
            }
        }
        self.set_phase(WorkerPhase::Active);
        info!("Worker active (cache {})", self.cache_name);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::Method;

    use super::*;
    use crate::worker::storage::{MemoryCaches, MemoryKv};
    use crate::worker::testing::{FakeFetcher, FakeWindows};
    use crate::worker::traits::{CacheStorage, FetchError, StoredResponse};
    use crate::worker::{OfflineWorker, STATIC_MANIFEST};

    fn worker(caches: Arc<MemoryCaches>, fetcher: Arc<FakeFetcher>) -> OfflineWorker {
        OfflineWorker::new(
            caches,
            Arc::new(MemoryKv::new()),
            fetcher,
            Arc::new(FakeWindows::default()),
        )
    }

    #[tokio::test]
    async fn test_install_pre_caches_manifest() {
        let caches = Arc::new(MemoryCaches::new());
        let fetcher = Arc::new(FakeFetcher::new());
        for url in STATIC_MANIFEST {
            fetcher.script(Method::GET, url, Ok(StoredResponse::ok("text/html", "asset")));
        }

        let worker = worker(Arc::clone(&caches), fetcher);
        worker.install().await;

        assert_eq!(caches.len(worker.cache_name()), STATIC_MANIFEST.len());
    }

    #[tokio::test]
    async fn test_install_survives_unreachable_asset() {
        let caches = Arc::new(MemoryCaches::new());
        let fetcher = Arc::new(FakeFetcher::new());
        for url in STATIC_MANIFEST {
            if *url == "/css/style.css" {
                fetcher.script(
                    Method::GET,
                    url,
                    Err(FetchError::Network("unreachable".to_string())),
                );
            } else {
                fetcher.script(Method::GET, url, Ok(StoredResponse::ok("text/html", "asset")));
            }
        }

        let worker = worker(Arc::clone(&caches), fetcher);
        worker.install().await;

        assert_eq!(worker.phase(), WorkerPhase::Waiting);
        assert_eq!(caches.len(worker.cache_name()), STATIC_MANIFEST.len() - 1);
        assert!(caches.get(worker.cache_name(), "/css/style.css").await.is_none());
        assert!(caches.get(worker.cache_name(), "/index.html").await.is_some());
    }

    #[tokio::test]
    async fn test_activate_prunes_only_stale_caches() {
        let caches = Arc::new(MemoryCaches::new());
        caches
            .put("resume-builder-v0", "/", StoredResponse::ok("text/html", "old"))
            .await;
        caches
            .put("resume-builder-v1", "/", StoredResponse::ok("text/html", "new"))
            .await;
        caches
            .put("unrelated-cache", "/", StoredResponse::ok("text/html", "x"))
            .await;

        let worker = worker(Arc::clone(&caches), Arc::new(FakeFetcher::new()));
        worker.activate().await;

        let mut names = caches.cache_names().await;
        names.sort();
        assert_eq!(names, vec!["resume-builder-v1".to_string()]);
        assert!(caches.get("resume-builder-v1", "/").await.is_some());
    }

    #[tokio::test]
    async fn test_phase_progression() {
        let worker = worker(Arc::new(MemoryCaches::new()), Arc::new(FakeFetcher::new()));
        assert_eq!(worker.phase(), WorkerPhase::Installing);
        worker.install().await;
        assert_eq!(worker.phase(), WorkerPhase::Waiting);
        worker.activate().await;
        assert_eq!(worker.phase(), WorkerPhase::Active);
    }

    #[tokio::test]
    async fn test_new_version_displaces_old_cache() {
        let caches = Arc::new(MemoryCaches::new());
        let fetcher = Arc::new(FakeFetcher::new());
        fetcher.script(Method::GET, "/", Ok(StoredResponse::ok("text/html", "v2")));

        // Old version already active with its cache populated.
        caches
            .put("resume-builder-v1", "/", StoredResponse::ok("text/html", "v1"))
            .await;

        let next = OfflineWorker::new(
            Arc::clone(&caches) as Arc<dyn CacheStorage>,
            Arc::new(MemoryKv::new()),
            fetcher,
            Arc::new(FakeWindows::default()),
        )
        .with_cache_name("resume-builder-v2")
        .with_manifest(vec!["/".to_string()]);

        next.install().await;
        next.activate().await;

        assert_eq!(caches.cache_names().await, vec!["resume-builder-v2".to_string()]);
    }
}
