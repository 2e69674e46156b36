//! Source Registry admin routes (§6: `/sources`).

use crate::{error::ApiError, response::success, state::AppState};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use preventia_core::error::{Error, ErrorCode};
use preventia_domain::{CreateSourceRequest, SourceRepository, SourceService, UpdateSourceRequest};

pub fn source_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sources).post(create_source))
        .route("/:id", get(get_source).put(update_source).delete(delete_source))
        .route("/:id/suspend", post(suspend_source))
        .route("/:id/activate", post(activate_source))
}

async fn list_sources(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let sources = state.sources.list_all().await?;
    Ok(Json(success(sources)))
}

async fn get_source(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let source = state
        .sources
        .find_by_id(id)
        .await?
        .ok_or_else(|| Error::new(ErrorCode::ResourceNotFound, "source not found"))?;
    Ok(Json(success(source)))
}

async fn create_source(
    State(state): State<AppState>,
    Json(request): Json<CreateSourceRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let source = state.source_service.create_source(request).await?;
    Ok(Json(success(source)))
}

async fn update_source(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateSourceRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let source = state.source_service.update_source(id, request).await?;
    Ok(Json(success(source)))
}

async fn delete_source(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.source_service.delete_source(id).await?;
    Ok(Json(success(serde_json::json!({ "source_id": id, "deleted": true }))))
}

#[derive(serde::Deserialize)]
struct SuspendRequest {
    reason: String,
}

async fn suspend_source(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<SuspendRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.source_service.suspend_source(id, &body.reason).await?;
    Ok(Json(success(serde_json::json!({ "source_id": id, "status": "suspended" }))))
}

async fn activate_source(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.source_service.activate_source(id).await?;
    Ok(Json(success(serde_json::json!({ "source_id": id, "status": "active" }))))
}
