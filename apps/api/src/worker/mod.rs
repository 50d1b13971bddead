//! Offline cache layer for the resume builder PWA.
//!
//! Service-worker semantics expressed as an explicit, host-free pipeline:
//! versioned pre-cache on install, stale-cache pruning on activate, a
//! per-request interception policy (cache-first for static assets,
//! network-first for API GETs), background replay of writes queued while
//! offline, and push/notification handling.
//!
//! All collaborators (cache storage, key-value store, network, window
//! clients) are injected behind traits so the whole layer runs against
//! in-memory fakes in tests.

#![allow(dead_code)]

pub mod fetch;
pub mod lifecycle;
pub mod push;
pub mod storage;
pub mod sync;
pub mod traits;

use std::sync::{Arc, Mutex};

use crate::worker::lifecycle::WorkerPhase;
use crate::worker::traits::{CacheStorage, Fetcher, KvStore, WindowClients};

/// Version-named cache. Bumping the suffix invalidates every previously
/// cached entry at activation time.
pub const CACHE_NAME: &str = "resume-builder-v1";

/// Static assets pre-cached on install.
pub const STATIC_MANIFEST: &[&str] = &[
    "/",
    "/index.html",
    "/css/style.css",
    "/js/app.js",
    "/js/pwa-register.js",
    "/manifest.json",
];

/// Key-value slot holding the pending-write queue.
pub const QUEUE_KEY: &str = "pending-resumes";

/// Synchronization trigger that starts a replay pass.
pub const SYNC_TAG: &str = "sync-resumes";

/// Fixed notification tag, so repeated notifications replace rather than stack.
pub const NOTIFICATION_TAG: &str = "resume-notification";

/// Requests under this prefix are handled network-first.
pub const API_PREFIX: &str = "/api/";

/// The worker instance. One per deployed version; a new version starts its
/// own instance in `Installing` while the old one keeps serving.
pub struct OfflineWorker {
    cache_name: String,
    manifest: Vec<String>,
    caches: Arc<dyn CacheStorage>,
    kv: Arc<dyn KvStore>,
    fetcher: Arc<dyn Fetcher>,
    clients: Arc<dyn WindowClients>,
    phase: Mutex<WorkerPhase>,
}

impl OfflineWorker {
    pub fn new(
        caches: Arc<dyn CacheStorage>,
        kv: Arc<dyn KvStore>,
        fetcher: Arc<dyn Fetcher>,
        clients: Arc<dyn WindowClients>,
    ) -> Self {
        Self {
            cache_name: CACHE_NAME.to_string(),
            manifest: STATIC_MANIFEST.iter().map(|s| s.to_string()).collect(),
            caches,
            kv,
            fetcher,
            clients,
            phase: Mutex::new(WorkerPhase::Installing),
        }
    }

    /// Overrides the version-named cache, for deploying a new version.
    pub fn with_cache_name(mut self, name: impl Into<String>) -> Self {
        self.cache_name = name.into();
        self
    }

    pub fn with_manifest(mut self, manifest: Vec<String>) -> Self {
        self.manifest = manifest;
        self
    }

    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }
}
