use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

/// GET /api/health
/// Returns the standard success envelope with a server timestamp.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Resume Builder API is running",
        "timestamp": Utc::now(),
    }))
}
