//! Article read routes (§6: `/articles`, `/articles/{id}`).

use crate::{error::ApiError, response::success_with_meta, state::AppState};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use preventia_analytics::{articles_search, Pagination, SearchFilters};
use preventia_core::error::{Error, ErrorCode};
use preventia_domain::ArticleRepository;
use serde::Deserialize;

pub fn article_routes() -> Router<AppState> {
    Router::new().route("/", get(search_articles)).route("/:id", get(get_article))
}

#[derive(Deserialize)]
struct ArticleSearchQuery {
    #[serde(flatten)]
    filters: SearchFilters,
    #[serde(default = "default_page")]
    page: i64,
    #[serde(default = "default_page_size")]
    page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    20
}

async fn search_articles(
    State(state): State<AppState>,
    Query(query): Query<ArticleSearchQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let pagination = Pagination { page: query.page, page_size: query.page_size };
    let results = articles_search(state.db.get(), query.filters, pagination).await?;
    let meta = serde_json::json!({
        "page": results.page,
        "page_size": results.page_size,
        "total": results.total,
    });
    Ok(Json(success_with_meta(results.items, meta)))
}

async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let article = state
        .articles
        .find_by_id(id)
        .await?
        .ok_or_else(|| Error::new(ErrorCode::ResourceNotFound, "article not found"))?;
    Ok(Json(crate::response::success(article)))
}
