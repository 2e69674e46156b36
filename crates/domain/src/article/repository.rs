//! Postgres-backed `ArticleRepository` (§4.7): content-hash-unique insert,
//! atomic NLP-field fills, retention purges, and the read paths analytics
//! builds on — all scoped to `processing_status = completed` where §4.8
//! requires it.

use super::model::{Article, NewArticle, NlpResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use preventia_core::audit::{AuditAction, AuditEvent, AuditLogger};
use preventia_core::error::{Error, ErrorCode, Result};
use sqlx::PgPool;

/// Outcome of an insert attempt that treats a duplicate `content_hash` as an
/// expected result (§4.7), not an error path.
#[derive(Debug, Clone)]
pub enum InsertOutcome {
    Inserted(Article),
    Duplicate,
}

#[async_trait]
pub trait ArticleRepository: Send + Sync {
    async fn insert(&self, article: &NewArticle) -> Result<InsertOutcome>;
    /// Inserts and writes the `create` audit row in one transaction, so an
    /// external observer never sees the Article without it (§5).
    async fn insert_with_audit(
        &self,
        article: &NewArticle,
        audit: &AuditLogger,
    ) -> Result<InsertOutcome>;
    async fn find_by_id(&self, article_id: i64) -> Result<Option<Article>>;
    async fn find_by_url(&self, url: &str) -> Result<Option<Article>>;
    async fn list_pending_nlp(&self, limit: i64) -> Result<Vec<Article>>;
    /// Fills the NLP fields and writes the `update` audit row in the same
    /// transaction (§5 Testable Property #3).
    async fn apply_nlp_result(
        &self,
        article_id: i64,
        result: &NlpResult,
        audit: &AuditLogger,
    ) -> Result<()>;
    async fn mark_nlp_failed(&self, article_id: i64, reason: &str, audit: &AuditLogger) -> Result<()>;
    async fn purge_expired(&self, before: DateTime<Utc>) -> Result<Vec<i64>>;
}

const ARTICLE_COLUMNS: &str = "article_id, url, content_hash, source_id, title, summary, \
     content, word_count, language, published_at, scraped_at, author, robots_txt_compliant, \
     copyright_status, fair_use_basis, scraping_permission, legal_review_status, \
     data_retention_expires_at, sentiment_label, sentiment_score, sentiment_confidence, \
     topic_category, topic_confidence, processing_status, created_at, updated_at";

pub struct PostgresArticleRepository {
    pool: PgPool,
}

impl PostgresArticleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArticleRepository for PostgresArticleRepository {
    async fn insert(&self, article: &NewArticle) -> Result<InsertOutcome> {
        let result = sqlx::query_as::<_, Article>(&format!(
            "INSERT INTO articles \
             (url, content_hash, source_id, title, summary, content, word_count, language, \
              published_at, scraped_at, author, robots_txt_compliant, copyright_status, \
              fair_use_basis, scraping_permission, legal_review_status, \
              data_retention_expires_at, processing_status) \
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16,$17,'pending') \
             RETURNING {ARTICLE_COLUMNS}"
        ))
        .bind(&article.url)
        .bind(&article.content_hash)
        .bind(article.source_id)
        .bind(&article.title)
        .bind(&article.summary)
        .bind(&article.content)
        .bind(article.word_count)
        .bind(&article.language)
        .bind(article.published_at)
        .bind(article.scraped_at)
        .bind(&article.author)
        .bind(article.robots_txt_compliant)
        .bind(article.copyright_status)
        .bind(&article.fair_use_basis)
        .bind(&article.scraping_permission)
        .bind(article.legal_review_status)
        .bind(article.data_retention_expires_at)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(inserted) => Ok(InsertOutcome::Inserted(inserted)),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Ok(InsertOutcome::Duplicate)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn insert_with_audit(
        &self,
        article: &NewArticle,
        audit: &AuditLogger,
    ) -> Result<InsertOutcome> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query_as::<_, Article>(&format!(
            "INSERT INTO articles \
             (url, content_hash, source_id, title, summary, content, word_count, language, \
              published_at, scraped_at, author, robots_txt_compliant, copyright_status, \
              fair_use_basis, scraping_permission, legal_review_status, \
              data_retention_expires_at, processing_status) \
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16,$17,'pending') \
             RETURNING {ARTICLE_COLUMNS}"
        ))
        .bind(&article.url)
        .bind(&article.content_hash)
        .bind(article.source_id)
        .bind(&article.title)
        .bind(&article.summary)
        .bind(&article.content)
        .bind(article.word_count)
        .bind(&article.language)
        .bind(article.published_at)
        .bind(article.scraped_at)
        .bind(&article.author)
        .bind(article.robots_txt_compliant)
        .bind(article.copyright_status)
        .bind(&article.fair_use_basis)
        .bind(&article.scraping_permission)
        .bind(article.legal_review_status)
        .bind(article.data_retention_expires_at)
        .fetch_one(&mut *tx)
        .await;

        let inserted = match result {
            Ok(inserted) => inserted,
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                tx.rollback().await?;
                return Ok(InsertOutcome::Duplicate);
            }
            Err(e) => return Err(e.into()),
        };

        let event = AuditEvent::builder(AuditAction::Create, format!("article ingested: {}", inserted.url))
            .resource("articles", inserted.article_id.to_string())
            .build();
        audit.log_event_tx(&mut tx, event).await?;
        tx.commit().await?;

        Ok(InsertOutcome::Inserted(inserted))
    }

    async fn find_by_id(&self, article_id: i64) -> Result<Option<Article>> {
        let article = sqlx::query_as::<_, Article>(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles WHERE article_id = $1"
        ))
        .bind(article_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(article)
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<Article>> {
        let article = sqlx::query_as::<_, Article>(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles WHERE url = $1"
        ))
        .bind(url)
        .fetch_optional(&self.pool)
        .await?;
        Ok(article)
    }

    async fn list_pending_nlp(&self, limit: i64) -> Result<Vec<Article>> {
        let articles = sqlx::query_as::<_, Article>(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles \
             WHERE processing_status = 'pending' ORDER BY scraped_at ASC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(articles)
    }

    /// Fills every NLP field and flips `processing_status` in one statement
    /// (§4.6: "never partially fills") plus a keyword batch, both inside the
    /// same transaction.
    async fn apply_nlp_result(
        &self,
        article_id: i64,
        result: &NlpResult,
        audit: &AuditLogger,
    ) -> Result<()> {
        if result.sentiment_score < -1.0 || result.sentiment_score > 1.0 {
            return Err(Error::new(ErrorCode::ValidationFailed, "sentiment_score out of range"));
        }

        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE articles SET \
             sentiment_label = $1, sentiment_score = $2, sentiment_confidence = $3, \
             topic_category = $4, topic_confidence = $5, processing_status = 'completed', \
             updated_at = now() \
             WHERE article_id = $6 AND processing_status = 'pending'",
        )
        .bind(result.sentiment_label)
        .bind(result.sentiment_score)
        .bind(result.sentiment_confidence)
        .bind(&result.topic_category)
        .bind(result.topic_confidence)
        .bind(article_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(Error::new(
                ErrorCode::ResourceNotFound,
                "article not found or not pending NLP",
            ));
        }

        for (keyword, relevance_score, keyword_type) in &result.keywords {
            sqlx::query(
                "INSERT INTO article_keywords (article_id, keyword, relevance_score, keyword_type) \
                 VALUES ($1, $2, $3, $4) \
                 ON CONFLICT (article_id, keyword) DO UPDATE SET relevance_score = EXCLUDED.relevance_score",
            )
            .bind(article_id)
            .bind(keyword)
            .bind(relevance_score)
            .bind(keyword_type)
            .execute(&mut *tx)
            .await?;
        }

        let event = AuditEvent::builder(AuditAction::Update, format!("NLP result applied to article {article_id}"))
            .resource("articles", article_id.to_string())
            .build();
        audit.log_event_tx(&mut tx, event).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn mark_nlp_failed(&self, article_id: i64, reason: &str, audit: &AuditLogger) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "UPDATE articles SET processing_status = 'failed', updated_at = now() \
             WHERE article_id = $1",
        )
        .bind(article_id)
        .execute(&mut *tx)
        .await?;

        let event = AuditEvent::builder(AuditAction::Update, format!("NLP processing failed for article {article_id}: {reason}"))
            .resource("articles", article_id.to_string())
            .outcome(preventia_core::audit::EventOutcome::Failure)
            .build();
        audit.log_event_tx(&mut tx, event).await?;
        tx.commit().await?;

        tracing::warn!(article_id, reason, "NLP processing failed");
        Ok(())
    }

    /// Clears content fields for Articles past `data_retention_expires_at`,
    /// retaining id/url/content_hash for audit continuity (§3/§8 scenario 5).
    /// Returns the ids purged so the caller can write one audit entry per row.
    async fn purge_expired(&self, before: DateTime<Utc>) -> Result<Vec<i64>> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            "UPDATE articles SET content = NULL, summary = NULL, title = '[purged]' \
             WHERE data_retention_expires_at < $1 AND content IS NOT NULL \
             RETURNING article_id",
        )
        .bind(before)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}

/// Convenience re-export so callers constructing a purge job don't need the
/// `ProcessingStatus` enum's module path.
pub use super::model::ProcessingStatus as ArticleProcessingStatus;
