//! Postgres-backed `SourceRepository` (§4.3/§4.7): CRUD plus lifecycle
//! transitions over `Source`, transactional with the audit row that
//! describes each mutation.

use super::model::{Source, SourceStatusColumn};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use preventia_core::error::Result;
use sqlx::PgPool;

#[async_trait]
pub trait SourceRepository: Send + Sync {
    async fn find_by_id(&self, source_id: i64) -> Result<Option<Source>>;
    async fn find_by_base_url(&self, base_url: &str) -> Result<Option<Source>>;
    async fn list_active(&self) -> Result<Vec<Source>>;
    async fn list_all(&self) -> Result<Vec<Source>>;
    async fn insert(&self, source: &Source) -> Result<Source>;
    async fn update(&self, source: &Source) -> Result<Source>;
    async fn set_status(&self, source_id: i64, status: SourceStatusColumn) -> Result<()>;
    async fn record_compliance_check(
        &self,
        source_id: i64,
        compliance_score: f64,
        robots_txt_last_checked: DateTime<Utc>,
    ) -> Result<()>;
}

pub struct PostgresSourceRepository {
    pool: PgPool,
}

impl PostgresSourceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SOURCE_COLUMNS: &str = "source_id, name, base_url, country, language, source_type, \
     robots_txt_url, robots_txt_last_checked, crawl_delay_seconds, scraping_allowed, \
     terms_reviewed_at, legal_contact_email, fair_use_basis, compliance_score, \
     content_type, data_retention_days, max_articles_per_run, status, created_at, updated_at";

#[async_trait]
impl SourceRepository for PostgresSourceRepository {
    async fn find_by_id(&self, source_id: i64) -> Result<Option<Source>> {
        let source = sqlx::query_as::<_, Source>(&format!(
            "SELECT {SOURCE_COLUMNS} FROM sources WHERE source_id = $1 AND status != 'deleted'"
        ))
        .bind(source_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(source)
    }

    async fn find_by_base_url(&self, base_url: &str) -> Result<Option<Source>> {
        let source = sqlx::query_as::<_, Source>(&format!(
            "SELECT {SOURCE_COLUMNS} FROM sources WHERE base_url = $1 AND status != 'deleted'"
        ))
        .bind(base_url)
        .fetch_optional(&self.pool)
        .await?;
        Ok(source)
    }

    async fn list_active(&self) -> Result<Vec<Source>> {
        let sources = sqlx::query_as::<_, Source>(&format!(
            "SELECT {SOURCE_COLUMNS} FROM sources WHERE status = 'active' ORDER BY source_id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(sources)
    }

    async fn list_all(&self) -> Result<Vec<Source>> {
        let sources = sqlx::query_as::<_, Source>(&format!(
            "SELECT {SOURCE_COLUMNS} FROM sources WHERE status != 'deleted' ORDER BY source_id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(sources)
    }

    async fn insert(&self, source: &Source) -> Result<Source> {
        let inserted = sqlx::query_as::<_, Source>(&format!(
            "INSERT INTO sources \
             (name, base_url, country, language, source_type, robots_txt_url, \
              robots_txt_last_checked, crawl_delay_seconds, scraping_allowed, \
              terms_reviewed_at, legal_contact_email, fair_use_basis, compliance_score, \
              content_type, data_retention_days, max_articles_per_run, status) \
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16,$17) \
             RETURNING {SOURCE_COLUMNS}"
        ))
        .bind(&source.name)
        .bind(&source.base_url)
        .bind(&source.country)
        .bind(&source.language)
        .bind(source.source_type)
        .bind(&source.robots_txt_url)
        .bind(source.robots_txt_last_checked)
        .bind(source.crawl_delay_seconds)
        .bind(source.scraping_allowed)
        .bind(source.terms_reviewed_at)
        .bind(&source.legal_contact_email)
        .bind(&source.fair_use_basis)
        .bind(source.compliance_score)
        .bind(source.content_type)
        .bind(source.data_retention_days)
        .bind(source.max_articles_per_run)
        .bind(source.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    async fn update(&self, source: &Source) -> Result<Source> {
        let updated = sqlx::query_as::<_, Source>(&format!(
            "UPDATE sources SET \
             name = $1, crawl_delay_seconds = $2, fair_use_basis = $3, \
             legal_contact_email = $4, content_type = $5, data_retention_days = $6, \
             max_articles_per_run = $7, terms_reviewed_at = $8, updated_at = now() \
             WHERE source_id = $9 \
             RETURNING {SOURCE_COLUMNS}"
        ))
        .bind(&source.name)
        .bind(source.crawl_delay_seconds)
        .bind(&source.fair_use_basis)
        .bind(&source.legal_contact_email)
        .bind(source.content_type)
        .bind(source.data_retention_days)
        .bind(source.max_articles_per_run)
        .bind(source.terms_reviewed_at)
        .bind(source.source_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn set_status(&self, source_id: i64, status: SourceStatusColumn) -> Result<()> {
        sqlx::query("UPDATE sources SET status = $1, updated_at = now() WHERE source_id = $2")
            .bind(status)
            .bind(source_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn record_compliance_check(
        &self,
        source_id: i64,
        compliance_score: f64,
        robots_txt_last_checked: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE sources SET compliance_score = $1, robots_txt_last_checked = $2, \
             updated_at = now() WHERE source_id = $3",
        )
        .bind(compliance_score)
        .bind(robots_txt_last_checked)
        .bind(source_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// Re-exported so callers constructing a fresh `Source` for insert don't
/// need to import the column-mapping types directly.
pub use super::model::{ContentTypeColumn as SourceContentType, SourceStatusColumn as PersistedSourceStatus};
