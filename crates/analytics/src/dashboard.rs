//! `dashboard_summary` (§4.8): the headline numbers for a rolling window,
//! computed in one round trip per shape (counts, sentiment mix, topic mix).

use chrono::Utc;
use preventia_core::error::Result;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_articles: i64,
    pub recent_articles: i64,
    pub sentiment_distribution: HashMap<String, i64>,
    pub topic_distribution: HashMap<String, i64>,
    pub active_sources: i64,
    pub avg_sentiment_score: f64,
    pub analysis_period_days: i32,
}

/// Every query here scopes to `processing_status = 'completed'` per §4.8:
/// "Analytics MUST ignore Articles with processing_status != completed."
pub async fn dashboard_summary(pool: &PgPool, window_days: i32) -> Result<DashboardSummary> {
    let cutoff = Utc::now() - chrono::Duration::days(window_days as i64);

    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
        .execute(&mut *tx)
        .await?;

    let (total_articles,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM articles WHERE processing_status = 'completed'")
            .fetch_one(&mut *tx)
            .await?;

    let (recent_articles,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM articles \
         WHERE processing_status = 'completed' AND published_at >= $1",
    )
    .bind(cutoff)
    .fetch_one(&mut *tx)
    .await?;

    let sentiment_rows: Vec<(String, i64)> = sqlx::query_as(
        "SELECT sentiment_label::text, COUNT(*) FROM articles \
         WHERE processing_status = 'completed' AND published_at >= $1 \
         GROUP BY sentiment_label",
    )
    .bind(cutoff)
    .fetch_all(&mut *tx)
    .await?;

    let topic_rows: Vec<(String, i64)> = sqlx::query_as(
        "SELECT topic_category, COUNT(*) FROM articles \
         WHERE processing_status = 'completed' AND published_at >= $1 \
         GROUP BY topic_category",
    )
    .bind(cutoff)
    .fetch_all(&mut *tx)
    .await?;

    let (active_sources,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM sources WHERE status = 'active'")
            .fetch_one(&mut *tx)
            .await?;

    let (avg_sentiment_score,): (Option<f64>,) = sqlx::query_as(
        "SELECT AVG(sentiment_score) FROM articles \
         WHERE processing_status = 'completed' AND published_at >= $1",
    )
    .bind(cutoff)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(DashboardSummary {
        total_articles,
        recent_articles,
        sentiment_distribution: sentiment_rows.into_iter().collect(),
        topic_distribution: topic_rows.into_iter().collect(),
        active_sources,
        avg_sentiment_score: avg_sentiment_score.unwrap_or(0.0),
        analysis_period_days: window_days,
    })
}
