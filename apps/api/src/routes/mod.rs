pub mod health;
pub mod resume;

use axum::{
    handler::HandlerWithoutStateExt,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::services::ServeDir;

use crate::state::AppState;

/// Terminal JSON 404 for anything neither the API nor the static tree matched.
async fn route_not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "message": "Route not found",
        })),
    )
}

pub fn build_router(state: AppState) -> Router {
    // Static PWA assets at `/`, with the JSON 404 behind them.
    let static_assets =
        ServeDir::new(&state.config.static_dir).not_found_service(route_not_found.into_service());

    Router::new()
        .route("/api/health", get(health::health_handler))
        .route("/api/resume", get(resume::list_resumes))
        .route("/api/resume/save", post(resume::save_resume))
        .route(
            "/api/resume/:id",
            get(resume::get_resume)
                .put(resume::update_resume)
                .delete(resume::delete_resume),
        )
        .fallback_service(static_assets)
        .with_state(state)
}
