//! Scraper trigger route (§6: `/scrapers/run/{source_id}`): runs §4.5's
//! `run_source` for one Source on demand, outside the orchestrator's own
//! scheduling.

use crate::{error::ApiError, response::success, state::AppState};
use axum::{
    extract::{Path, Query, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;

pub fn scraper_routes() -> Router<AppState> {
    Router::new().route("/run/:source_id", post(run_source))
}

#[derive(Deserialize)]
struct RunQuery {
    max_articles: Option<i32>,
}

async fn run_source(
    State(state): State<AppState>,
    Path(source_id): Path<i64>,
    Query(query): Query<RunQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let report = state.orchestrator.run_source(source_id, query.max_articles).await?;
    Ok(Json(success(report)))
}
