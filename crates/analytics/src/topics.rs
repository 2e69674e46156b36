//! `topic_distribution` / `topic_timeline` (§4.8).

use chrono::{DateTime, Utc};
use preventia_core::error::Result;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct TopicBucket {
    pub topic_category: String,
    pub article_count: i64,
    pub avg_confidence: f64,
    pub avg_sentiment_score: f64,
}

pub async fn topic_distribution(
    pool: &PgPool,
    date_from: DateTime<Utc>,
    date_to: DateTime<Utc>,
    min_confidence: f64,
) -> Result<Vec<TopicBucket>> {
    let rows = sqlx::query_as::<_, TopicBucket>(
        "SELECT topic_category, \
                COUNT(*) AS article_count, \
                COALESCE(AVG(topic_confidence), 0.0) AS avg_confidence, \
                COALESCE(AVG(sentiment_score), 0.0) AS avg_sentiment_score \
         FROM articles \
         WHERE processing_status = 'completed' \
           AND published_at BETWEEN $1 AND $2 \
           AND topic_confidence >= $3 \
         GROUP BY topic_category \
         ORDER BY article_count DESC",
    )
    .bind(date_from)
    .bind(date_to)
    .bind(min_confidence)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct TopicTimelinePoint {
    pub period_start: DateTime<Utc>,
    pub topic_category: String,
    pub article_count: i64,
}

pub async fn topic_timeline(
    pool: &PgPool,
    date_from: DateTime<Utc>,
    date_to: DateTime<Utc>,
    min_confidence: f64,
) -> Result<Vec<TopicTimelinePoint>> {
    let rows = sqlx::query_as::<_, TopicTimelinePoint>(
        "SELECT date_trunc('week', published_at) AS period_start, \
                topic_category, \
                COUNT(*) AS article_count \
         FROM articles \
         WHERE processing_status = 'completed' \
           AND published_at BETWEEN $1 AND $2 \
           AND topic_confidence >= $3 \
         GROUP BY period_start, topic_category \
         ORDER BY period_start ASC, topic_category ASC",
    )
    .bind(date_from)
    .bind(date_to)
    .bind(min_confidence)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
