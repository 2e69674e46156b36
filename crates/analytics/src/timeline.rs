//! `sentiment_timeline` (§4.8): sentiment mix bucketed by day/week/month.

use preventia_core::error::{Error, ErrorCode, Result};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Day,
    Week,
    Month,
}

impl Granularity {
    fn trunc_unit(self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct TimelineBucket {
    pub period_start: chrono::DateTime<chrono::Utc>,
    pub total: i64,
    pub positive: i64,
    pub negative: i64,
    pub neutral: i64,
    pub avg_sentiment_score: f64,
}

/// `weeks` bounds how far back the series reaches; `granularity` controls
/// the bucket width. Both axes are independent per §4.8.
pub async fn sentiment_timeline(
    pool: &PgPool,
    weeks: i32,
    granularity: Granularity,
) -> Result<Vec<TimelineBucket>> {
    if weeks <= 0 {
        return Err(Error::new(
            ErrorCode::ValidationFailed,
            "weeks must be a positive integer",
        ));
    }

    let cutoff = chrono::Utc::now() - chrono::Duration::weeks(weeks as i64);
    let sql = format!(
        "SELECT \
            date_trunc('{unit}', published_at) AS period_start, \
            COUNT(*) AS total, \
            COUNT(*) FILTER (WHERE sentiment_label = 'positive') AS positive, \
            COUNT(*) FILTER (WHERE sentiment_label = 'negative') AS negative, \
            COUNT(*) FILTER (WHERE sentiment_label = 'neutral') AS neutral, \
            COALESCE(AVG(sentiment_score), 0.0) AS avg_sentiment_score \
         FROM articles \
         WHERE processing_status = 'completed' AND published_at >= $1 \
         GROUP BY period_start \
         ORDER BY period_start ASC",
        unit = granularity.trunc_unit()
    );

    let rows = sqlx::query_as::<_, TimelineBucket>(&sql)
        .bind(cutoff)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}
