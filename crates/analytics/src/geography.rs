//! `geographic_distribution` (§4.8).
//!
//! There is no per-article country field anywhere in the schema or the NLP
//! pipeline output — country is a property of the Source that published the
//! article, not of the article's content. This module joins `articles` to
//! `sources` and groups by `sources.country`; it reports a *source's*
//! geography, not a geolocation of the article text itself.

use chrono::{DateTime, Utc};
use preventia_core::error::Result;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct CountryBucket {
    pub country: String,
    pub article_count: i64,
    pub avg_sentiment_score: f64,
}

pub async fn geographic_distribution(
    pool: &PgPool,
    date_from: DateTime<Utc>,
    date_to: DateTime<Utc>,
    topic: Option<&str>,
) -> Result<Vec<CountryBucket>> {
    let rows = match topic {
        Some(topic) => {
            sqlx::query_as::<_, CountryBucket>(
                "SELECT s.country AS country, \
                        COUNT(*) AS article_count, \
                        COALESCE(AVG(a.sentiment_score), 0.0) AS avg_sentiment_score \
                 FROM articles a \
                 JOIN sources s ON s.source_id = a.source_id \
                 WHERE a.processing_status = 'completed' \
                   AND a.published_at BETWEEN $1 AND $2 \
                   AND a.topic_category = $3 \
                 GROUP BY s.country \
                 ORDER BY article_count DESC",
            )
            .bind(date_from)
            .bind(date_to)
            .bind(topic)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, CountryBucket>(
                "SELECT s.country AS country, \
                        COUNT(*) AS article_count, \
                        COALESCE(AVG(a.sentiment_score), 0.0) AS avg_sentiment_score \
                 FROM articles a \
                 JOIN sources s ON s.source_id = a.source_id \
                 WHERE a.processing_status = 'completed' \
                   AND a.published_at BETWEEN $1 AND $2 \
                 GROUP BY s.country \
                 ORDER BY article_count DESC",
            )
            .bind(date_from)
            .bind(date_to)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(rows)
}
