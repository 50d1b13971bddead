use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One stored resume document. The API enforces no schema: whatever object
/// shape the client submits is kept as-is in `fields` and flattened back out
/// on serialization, alongside the server-assigned identifier and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Keys owned by the server; client-submitted values for these are ignored.
pub const RESERVED_KEYS: &[&str] = &["id", "createdAt", "updatedAt"];

impl Record {
    /// Builds a fresh record from client-submitted fields, stripping any
    /// reserved keys the client tried to set.
    pub fn new(id: String, mut fields: Map<String, Value>) -> Self {
        for key in RESERVED_KEYS {
            fields.remove(*key);
        }
        let now = Utc::now();
        Record {
            id,
            created_at: now,
            updated_at: now,
            fields,
        }
    }

    /// Shallow-merges client fields over the stored ones. Identifier and
    /// creation time are preserved; the update time is restamped.
    pub fn merge(&mut self, fields: Map<String, Value>) {
        for (key, value) in fields {
            if RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }
            self.fields.insert(key, value);
        }
        self.updated_at = Utc::now();
    }
}

/// The full set of records, persisted as one JSON document
/// (`{ "resumes": [...] }`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Collection {
    #[serde(default)]
    pub resumes: Vec<Record>,
}
