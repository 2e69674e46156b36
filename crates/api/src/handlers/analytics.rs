//! Analytics Query Layer routes (§6, §4.8): read-only aggregates over
//! completed Articles.

use crate::{error::ApiError, response::success, state::AppState};
use axum::{extract::{Query, State}, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use preventia_analytics::{
    dashboard_summary, geographic_distribution, sentiment_timeline, topic_distribution, Granularity,
};
use serde::Deserialize;

pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/sentiment/timeline", get(timeline))
        .route("/topics/distribution", get(topics))
        .route("/geographic/distribution", get(geography))
}

#[derive(Deserialize)]
struct DashboardQuery {
    #[serde(default = "default_window_days")]
    window_days: i32,
}

fn default_window_days() -> i32 {
    30
}

async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let summary = dashboard_summary(state.db.get(), query.window_days).await?;
    Ok(Json(success(summary)))
}

#[derive(Deserialize)]
struct TimelineQuery {
    #[serde(default = "default_weeks")]
    weeks: i64,
    #[serde(default)]
    granularity: GranularityParam,
}

fn default_weeks() -> i64 {
    12
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "lowercase")]
enum GranularityParam {
    Day,
    #[default]
    Week,
    Month,
}

impl From<GranularityParam> for Granularity {
    fn from(value: GranularityParam) -> Self {
        match value {
            GranularityParam::Day => Granularity::Day,
            GranularityParam::Week => Granularity::Week,
            GranularityParam::Month => Granularity::Month,
        }
    }
}

async fn timeline(
    State(state): State<AppState>,
    Query(query): Query<TimelineQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let buckets = sentiment_timeline(state.db.get(), query.weeks, query.granularity.into()).await?;
    Ok(Json(success(buckets)))
}

#[derive(Deserialize)]
struct TopicsQuery {
    date_from: DateTime<Utc>,
    date_to: DateTime<Utc>,
    #[serde(default)]
    min_confidence: f64,
}

async fn topics(
    State(state): State<AppState>,
    Query(query): Query<TopicsQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let buckets = topic_distribution(state.db.get(), query.date_from, query.date_to, query.min_confidence).await?;
    Ok(Json(success(buckets)))
}

#[derive(Deserialize)]
struct GeographyQuery {
    date_from: DateTime<Utc>,
    date_to: DateTime<Utc>,
    topic: Option<String>,
}

async fn geography(
    State(state): State<AppState>,
    Query(query): Query<GeographyQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let buckets =
        geographic_distribution(state.db.get(), query.date_from, query.date_to, query.topic.as_deref()).await?;
    Ok(Json(success(buckets)))
}
