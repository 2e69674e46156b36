//! `articles_search` (§4.8): filtered, paginated article listing for the
//! dashboard UI. Built as dynamic SQL (still plain `sqlx::query_as`, no
//! compile-time macros) since the filter set is open-ended and optional.

use chrono::{DateTime, Utc};
use preventia_core::error::{Error, ErrorCode, Result};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchFilters {
    pub sentiment_label: Option<String>,
    pub topic_category: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub query: Option<String>,
    pub source_id: Option<i64>,
}

#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub page: i64,
    pub page_size: i64,
}

impl Pagination {
    fn validated(self) -> Result<Self> {
        if self.page < 1 || self.page_size < 1 || self.page_size > 200 {
            return Err(Error::new(
                ErrorCode::ValidationFailed,
                "page must be >= 1 and page_size must be between 1 and 200",
            ));
        }
        Ok(self)
    }

    fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct SearchResultRow {
    pub article_id: i64,
    pub title: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
    pub sentiment_label: Option<String>,
    pub sentiment_score: Option<f64>,
    pub topic_category: Option<String>,
    pub topic_confidence: Option<f64>,
    pub source_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub items: Vec<SearchResultRow>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

fn apply_filters<'a>(builder: &mut QueryBuilder<'a, Postgres>, filters: &'a SearchFilters) {
    builder.push(" a.processing_status = 'completed' ");
    if let Some(ref label) = filters.sentiment_label {
        builder.push(" AND a.sentiment_label = ").push_bind(label);
    }
    if let Some(ref topic) = filters.topic_category {
        builder.push(" AND a.topic_category = ").push_bind(topic);
    }
    if let Some(ref country) = filters.country {
        builder.push(" AND s.country = ").push_bind(country);
    }
    if let Some(ref language) = filters.language {
        builder.push(" AND a.language = ").push_bind(language);
    }
    if let Some(date_from) = filters.date_from {
        builder.push(" AND a.published_at >= ").push_bind(date_from);
    }
    if let Some(date_to) = filters.date_to {
        builder.push(" AND a.published_at <= ").push_bind(date_to);
    }
    if let Some(source_id) = filters.source_id {
        builder.push(" AND a.source_id = ").push_bind(source_id);
    }
    if let Some(ref query) = filters.query {
        let pattern = format!("%{}%", query.replace('%', "\\%").replace('_', "\\_"));
        builder
            .push(" AND (a.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR a.summary ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

pub async fn articles_search(
    pool: &PgPool,
    filters: SearchFilters,
    pagination: Pagination,
) -> Result<SearchResults> {
    let pagination = pagination.validated()?;

    let mut count_builder: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT COUNT(*) FROM articles a JOIN sources s ON s.source_id = a.source_id WHERE ");
    apply_filters(&mut count_builder, &filters);
    let (total,): (i64,) = count_builder.build_query_as().fetch_one(pool).await?;

    let mut list_builder: QueryBuilder<Postgres> = QueryBuilder::new(
        "SELECT a.article_id, a.title, a.url, a.published_at, \
                a.sentiment_label::text AS sentiment_label, a.sentiment_score, \
                a.topic_category, a.topic_confidence, a.source_id \
         FROM articles a JOIN sources s ON s.source_id = a.source_id WHERE ",
    );
    apply_filters(&mut list_builder, &filters);
    list_builder
        .push(" ORDER BY a.published_at DESC NULLS LAST LIMIT ")
        .push_bind(pagination.page_size)
        .push(" OFFSET ")
        .push_bind(pagination.offset());

    let items = list_builder
        .build_query_as::<SearchResultRow>()
        .fetch_all(pool)
        .await?;

    Ok(SearchResults {
        items,
        total,
        page: pagination.page,
        page_size: pagination.page_size,
    })
}
