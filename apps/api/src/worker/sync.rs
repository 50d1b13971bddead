//! Background replay of writes queued while offline.
//!
//! The queue is a JSON array of records under a fixed key in client-side
//! storage. Replay is sequential in queue order; each success removes exactly
//! that record and persists the shrunken queue, so an interrupted pass never
//! re-plays what already landed.

use tracing::{error, info};

use crate::models::record::Record;
use crate::worker::traits::FetchRequest;
use crate::worker::{OfflineWorker, QUEUE_KEY, SYNC_TAG};

const SAVE_PATH: &str = "/api/resume/save";

impl OfflineWorker {
    /// Appends a record to the pending-write queue. Called when a network
    /// write fails; the record waits for the next sync trigger.
    pub async fn enqueue_pending(&self, record: Record) {
        let mut queue = self.load_queue().await;
        queue.push(record);
        self.store_queue(&queue).await;
    }

    pub async fn pending_queue(&self) -> Vec<Record> {
        self.load_queue().await
    }

    /// Handles a named synchronization trigger. Only `sync-resumes` starts a
    /// replay pass; any other tag is ignored.
    pub async fn sync(&self, tag: &str) {
        if tag != SYNC_TAG {
            return;
        }

        let queue = self.load_queue().await;
        let mut remaining = queue.clone();

        for record in &queue {
            let body = match serde_json::to_vec(record) {
                Ok(body) => body,
                Err(e) => {
                    error!("Skipping unserializable queued record {}: {e}", record.id);
                    continue;
                }
            };
            match self
                .fetcher
                .fetch(&FetchRequest::post_json(SAVE_PATH, body))
                .await
            {
                Ok(response) if response.is_success() => {
                    remaining.retain(|r| r.id != record.id);
                    self.store_queue(&remaining).await;
                    info!("Replayed queued resume {}", record.id);
                }
                Ok(response) => {
                    error!(
                        "Replay of resume {} rejected with status {}",
                        record.id, response.status
                    );
                }
                Err(e) => {
                    error!("Replay of resume {} failed: {e}", record.id);
                }
            }
        }
    }

    async fn load_queue(&self) -> Vec<Record> {
        let raw = match self.kv.get(QUEUE_KEY).await {
            Some(raw) => raw,
            None => return Vec::new(),
        };
        match serde_json::from_str(&raw) {
            Ok(queue) => queue,
            Err(e) => {
                error!("Error parsing pending-write queue: {e}");
                Vec::new()
            }
        }
    }

    async fn store_queue(&self, queue: &[Record]) {
        match serde_json::to_string(queue) {
            Ok(raw) => self.kv.set(QUEUE_KEY, raw).await,
            Err(e) => error!("Error persisting pending-write queue: {e}"),
        }
    }
}
