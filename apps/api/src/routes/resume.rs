use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Map, Value};

use crate::errors::AppError;
use crate::state::AppState;

/// GET /api/resume
pub async fn list_resumes(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let resumes = state.store.list().await;
    Ok(Json(json!({
        "success": true,
        "count": resumes.len(),
        "data": resumes,
    })))
}

/// GET /api/resume/:id
pub async fn get_resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let resume = state.store.get(&id).await?;
    Ok(Json(json!({
        "success": true,
        "data": resume,
    })))
}

/// POST /api/resume/save
/// Accepts any JSON object, assigns an identifier and timestamps, and returns
/// the full stored record.
pub async fn save_resume(
    State(state): State<AppState>,
    Json(fields): Json<Map<String, Value>>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let record = state.store.create(fields).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Resume saved successfully",
            "resumeId": record.id,
            "data": record,
        })),
    ))
}

/// PUT /api/resume/:id
pub async fn update_resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(fields): Json<Map<String, Value>>,
) -> Result<Json<Value>, AppError> {
    let record = state.store.update(&id, fields).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Resume updated successfully",
        "data": record,
    })))
}

/// DELETE /api/resume/:id
pub async fn delete_resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    state.store.delete(&id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Resume deleted successfully",
    })))
}
