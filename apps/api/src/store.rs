//! Whole-file JSON persistence for the resume collection.
//!
//! Every operation loads the entire collection, mutates it in memory, and
//! rewrites the file. There is no locking: two writers racing on the same
//! file can lose an update. That is an accepted limitation for this scope,
//! not a defect to fix here.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::record::{Collection, Record};

const COLLECTION_FILE: &str = "resumes.json";

pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Opens the store rooted at `data_dir`, creating the directory and an
    /// empty collection file on first run.
    pub async fn open(data_dir: &Path) -> Result<Self, AppError> {
        tokio::fs::create_dir_all(data_dir).await?;
        let path = data_dir.join(COLLECTION_FILE);
        if tokio::fs::try_exists(&path).await? {
            info!("Collection file found at {}", path.display());
        } else {
            let empty = serde_json::to_string_pretty(&Collection::default())?;
            tokio::fs::write(&path, empty).await?;
            info!("Initialized empty collection file at {}", path.display());
        }
        Ok(FileStore { path })
    }

    /// Reads the full collection. An unreadable or corrupt file degrades to
    /// an empty collection with an error log, so reads never hard-fail.
    async fn read(&self) -> Collection {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) => {
                error!("Error reading collection file: {e}");
                return Collection::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(collection) => collection,
            Err(e) => {
                error!("Error parsing collection file: {e}");
                Collection::default()
            }
        }
    }

    async fn write(&self, collection: &Collection) -> Result<(), AppError> {
        let raw = serde_json::to_string_pretty(collection)?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }

    pub async fn list(&self) -> Vec<Record> {
        self.read().await.resumes
    }

    pub async fn get(&self, id: &str) -> Result<Record, AppError> {
        self.read()
            .await
            .resumes
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound("Resume not found".to_string()))
    }

    /// Appends a new record with a generated identifier and returns it.
    pub async fn create(&self, fields: Map<String, Value>) -> Result<Record, AppError> {
        let mut collection = self.read().await;
        let id = next_id(&collection);
        let record = Record::new(id, fields);
        collection.resumes.push(record.clone());
        self.write(&collection).await?;
        Ok(record)
    }

    /// Shallow-merges `fields` into the record with `id`. Identifier and
    /// creation time survive; the update time is restamped.
    pub async fn update(&self, id: &str, fields: Map<String, Value>) -> Result<Record, AppError> {
        let mut collection = self.read().await;
        let record = collection
            .resumes
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound("Resume not found".to_string()))?;
        record.merge(fields);
        let updated = record.clone();
        self.write(&collection).await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let mut collection = self.read().await;
        let before = collection.resumes.len();
        collection.resumes.retain(|r| r.id != id);
        if collection.resumes.len() == before {
            return Err(AppError::NotFound("Resume not found".to_string()));
        }
        self.write(&collection).await?;
        Ok(())
    }
}

/// Millisecond-timestamp identifier, nudged past any value already present so
/// rapid creations within the same millisecond stay unique by construction.
fn next_id(collection: &Collection) -> String {
    let mut candidate = Utc::now().timestamp_millis();
    while collection
        .resumes
        .iter()
        .any(|r| r.id == candidate.to_string())
    {
        candidate += 1;
    }
    candidate.to_string()
}
