//! Push messages and notification clicks.

use serde::Deserialize;
use tracing::debug;

use crate::worker::{OfflineWorker, NOTIFICATION_TAG};

const APP_ROOT: &str = "/";
const DEFAULT_TITLE: &str = "Resume Builder";
const DEFAULT_BODY: &str = "Resume Builder notification";

/// Optional JSON payload carried by a push message. Missing fields default.
#[derive(Debug, Default, Deserialize)]
pub struct PushPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

/// What the worker asks the platform to display. The fixed tag makes
/// repeated notifications replace rather than stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub tag: String,
    pub require_interaction: bool,
}

impl OfflineWorker {
    /// Builds the notification for a push message. An absent or malformed
    /// payload falls back to the default fields.
    pub fn handle_push(&self, payload: Option<&[u8]>) -> Notification {
        let parsed = payload
            .and_then(|raw| match serde_json::from_slice::<PushPayload>(raw) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    debug!("Ignoring malformed push payload: {e}");
                    None
                }
            })
            .unwrap_or_default();

        Notification {
            title: parsed.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            body: parsed.body.unwrap_or_else(|| DEFAULT_BODY.to_string()),
            tag: NOTIFICATION_TAG.to_string(),
            require_interaction: false,
        }
    }

    /// Notification click: focus the first open window at the app root, or
    /// open a new one if none matches. The notification itself is closed by
    /// the platform before this runs.
    pub async fn handle_notification_click(&self) {
        for client in self.clients.list().await {
            if client.url == APP_ROOT && self.clients.focus(&client.id).await {
                return;
            }
        }
        self.clients.open(APP_ROOT).await;
    }
}
