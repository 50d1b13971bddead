//! In-memory implementations of the storage seams.
//!
//! These back the worker in tests and in any embedding that has no durable
//! client storage. Critical sections never hold a lock across an await.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::worker::traits::{CacheStorage, KvStore, StoredResponse};

/// Named caches held in memory: cache name → URL → response snapshot.
#[derive(Default)]
pub struct MemoryCaches {
    caches: Mutex<HashMap<String, HashMap<String, StoredResponse>>>,
}

impl MemoryCaches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in one named cache (absent cache counts as empty).
    pub fn len(&self, cache: &str) -> usize {
        self.caches
            .lock()
            .expect("cache lock poisoned")
            .get(cache)
            .map(|c| c.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl CacheStorage for MemoryCaches {
    async fn put(&self, cache: &str, url: &str, response: StoredResponse) {
        self.caches
            .lock()
            .expect("cache lock poisoned")
            .entry(cache.to_string())
            .or_default()
            .insert(url.to_string(), response);
    }

    async fn get(&self, cache: &str, url: &str) -> Option<StoredResponse> {
        self.caches
            .lock()
            .expect("cache lock poisoned")
            .get(cache)
            .and_then(|c| c.get(url))
            .cloned()
    }

    async fn cache_names(&self) -> Vec<String> {
        self.caches
            .lock()
            .expect("cache lock poisoned")
            .keys()
            .cloned()
            .collect()
    }

    async fn delete_cache(&self, cache: &str) -> bool {
        self.caches
            .lock()
            .expect("cache lock poisoned")
            .remove(cache)
            .is_some()
    }
}

/// In-memory key-value store standing in for client-side persistent storage.
#[derive(Default)]
pub struct MemoryKv {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryKv {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .expect("kv lock poisoned")
            .get(key)
            .cloned()
    }

    async fn set(&self, key: &str, value: String) {
        self.entries
            .lock()
            .expect("kv lock poisoned")
            .insert(key.to_string(), value);
    }
}
