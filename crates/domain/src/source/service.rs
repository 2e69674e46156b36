//! Business rules for source registration and lifecycle transitions (§4.3):
//! validation, then persistence, then an audit row — all three committed as
//! one unit so a reader never observes a Source mutation without its audit
//! trail.

use super::model::{
    ContentTypeColumn, CreateSourceRequest, ScrapingAllowed, Source, SourceStatusColumn,
    UpdateSourceRequest,
};
use async_trait::async_trait;
use chrono::Utc;
use preventia_compliance::{score_source, source_validated, ComplianceInputs};
use preventia_core::audit::AuditLogger;
use preventia_core::error::{Error, ErrorCode, Result};
use sqlx::PgPool;
use std::sync::Arc;
use validator::Validate;

#[async_trait]
pub trait SourceService: Send + Sync {
    async fn create_source(&self, request: CreateSourceRequest) -> Result<Source>;
    async fn update_source(&self, source_id: i64, request: UpdateSourceRequest) -> Result<Source>;
    async fn delete_source(&self, source_id: i64) -> Result<()>;
    async fn suspend_source(&self, source_id: i64, reason: &str) -> Result<()>;
    async fn activate_source(&self, source_id: i64) -> Result<()>;
    async fn revalidate_compliance(&self, source_id: i64) -> Result<(f64, preventia_compliance::RiskTier)>;
}

pub struct DefaultSourceService {
    pool: PgPool,
    audit: Arc<AuditLogger>,
}

impl DefaultSourceService {
    pub fn new(pool: PgPool, audit: Arc<AuditLogger>) -> Self {
        Self { pool, audit }
    }

    async fn validate_create(&self, request: &CreateSourceRequest) -> Result<()> {
        request.validate().map_err(|e| {
            Error::new(ErrorCode::ValidationFailed, format!("source validation failed: {}", e))
        })?;

        if request.content_type == ContentTypeColumn::Full && !request.full_content_override {
            return Err(Error::new(
                ErrorCode::ValidationFailed,
                "content_type 'full' requires an explicit operator override",
            ));
        }

        let parsed = url::Url::parse(&request.base_url)
            .map_err(|_| Error::new(ErrorCode::ValidationFailed, "base_url is not a valid URL"))?;
        let host = parsed
            .host_str()
            .map(|h| h.to_string())
            .ok_or_else(|| Error::new(ErrorCode::ValidationFailed, "base_url has no host"))?;

        if preventia_compliance::is_blocked_host(&host, &[]) {
            return Err(Error::new(
                ErrorCode::BlockedHost,
                "base_url resolves to a private or loopback host",
            ));
        }

        // Catches a hostname that only resolves to a private/loopback range
        // via DNS, which the literal-string check above cannot see.
        let port = parsed.port_or_known_default().unwrap_or(80);
        if preventia_compliance::resolves_to_blocked_range(&host, port).await {
            return Err(Error::new(
                ErrorCode::BlockedHost,
                "base_url resolves to a private or loopback host",
            ));
        }

        Ok(())
    }

    async fn fetch_source(&self, source_id: i64) -> Result<Source> {
        sqlx::query_as::<_, Source>(
            "SELECT source_id, name, base_url, country, language, source_type, \
             robots_txt_url, robots_txt_last_checked, crawl_delay_seconds, scraping_allowed, \
             terms_reviewed_at, legal_contact_email, fair_use_basis, compliance_score, \
             content_type, data_retention_days, max_articles_per_run, status, created_at, updated_at \
             FROM sources WHERE source_id = $1",
        )
        .bind(source_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::new(ErrorCode::ResourceNotFound, "source not found"))
    }
}

#[async_trait]
impl SourceService for DefaultSourceService {
    async fn create_source(&self, request: CreateSourceRequest) -> Result<Source> {
        self.validate_create(&request).await?;

        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query_as::<_, Source>(
            "INSERT INTO sources \
             (name, base_url, country, language, source_type, crawl_delay_seconds, \
              scraping_allowed, legal_contact_email, fair_use_basis, compliance_score, \
              content_type, data_retention_days, max_articles_per_run, status) \
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,'under_review') \
             RETURNING source_id, name, base_url, country, language, source_type, \
             robots_txt_url, robots_txt_last_checked, crawl_delay_seconds, scraping_allowed, \
             terms_reviewed_at, legal_contact_email, fair_use_basis, compliance_score, \
             content_type, data_retention_days, max_articles_per_run, status, created_at, updated_at",
        )
        .bind(&request.name)
        .bind(&request.base_url)
        .bind(&request.country)
        .bind(&request.language)
        .bind(request.source_type)
        .bind(request.crawl_delay_seconds)
        .bind(ScrapingAllowed::Unknown)
        .bind(&request.legal_contact_email)
        .bind(&request.fair_use_basis)
        .bind(0.0_f64)
        .bind(request.content_type)
        .bind(request.data_retention_days)
        .bind(request.max_articles_per_run)
        .fetch_one(&mut *tx)
        .await?;

        let event = preventia_core::audit::AuditEvent::builder(
            preventia_core::audit::AuditAction::Create,
            format!("source '{}' registered, pending review", inserted.name),
        )
        .resource("sources", inserted.source_id.to_string())
        .build();

        self.audit.log_event_tx(&mut tx, event).await?;
        tx.commit().await?;

        Ok(inserted)
    }

    async fn update_source(&self, source_id: i64, request: UpdateSourceRequest) -> Result<Source> {
        let before = self.fetch_source(source_id).await?;

        let mut tx = self.pool.begin().await?;

        let name = request.name.unwrap_or_else(|| before.name.clone());
        let crawl_delay = request.crawl_delay_seconds.unwrap_or(before.crawl_delay_seconds);
        let fair_use_basis = request.fair_use_basis.unwrap_or_else(|| before.fair_use_basis.clone());
        let legal_contact_email = request.legal_contact_email.or_else(|| before.legal_contact_email.clone());
        let content_type = request.content_type.unwrap_or(before.content_type);
        let retention_days = request.data_retention_days.unwrap_or(before.data_retention_days);
        let max_articles = request.max_articles_per_run.unwrap_or(before.max_articles_per_run);
        let terms_reviewed_at = request.terms_reviewed_at.or(before.terms_reviewed_at);

        if crawl_delay < 1.0 {
            return Err(Error::new(ErrorCode::ValidationFailed, "crawl_delay_seconds must be >= 1.0"));
        }
        if fair_use_basis.len() < 50 {
            return Err(Error::new(
                ErrorCode::ValidationFailed,
                "fair_use_basis must be at least 50 characters",
            ));
        }
        if content_type == ContentTypeColumn::Full && !request.full_content_override {
            return Err(Error::new(
                ErrorCode::ValidationFailed,
                "content_type 'full' requires an explicit operator override",
            ));
        }

        let updated = sqlx::query_as::<_, Source>(
            "UPDATE sources SET name = $1, crawl_delay_seconds = $2, fair_use_basis = $3, \
             legal_contact_email = $4, content_type = $5, data_retention_days = $6, \
             max_articles_per_run = $7, terms_reviewed_at = $8, updated_at = now() \
             WHERE source_id = $9 \
             RETURNING source_id, name, base_url, country, language, source_type, \
             robots_txt_url, robots_txt_last_checked, crawl_delay_seconds, scraping_allowed, \
             terms_reviewed_at, legal_contact_email, fair_use_basis, compliance_score, \
             content_type, data_retention_days, max_articles_per_run, status, created_at, updated_at",
        )
        .bind(&name)
        .bind(crawl_delay)
        .bind(&fair_use_basis)
        .bind(&legal_contact_email)
        .bind(content_type)
        .bind(retention_days)
        .bind(max_articles)
        .bind(terms_reviewed_at)
        .bind(source_id)
        .fetch_one(&mut *tx)
        .await?;

        let event = preventia_core::audit::AuditEvent::builder(
            preventia_core::audit::AuditAction::Update,
            format!("source '{}' updated", updated.name),
        )
        .resource("sources", source_id.to_string())
        .previous_values(serde_json::json!({ "fair_use_basis": before.fair_use_basis, "crawl_delay_seconds": before.crawl_delay_seconds }))
        .new_values(serde_json::json!({ "fair_use_basis": updated.fair_use_basis, "crawl_delay_seconds": updated.crawl_delay_seconds }))
        .build();

        self.audit.log_event_tx(&mut tx, event).await?;
        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_source(&self, source_id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE sources SET status = 'deleted', updated_at = now() WHERE source_id = $1")
            .bind(source_id)
            .execute(&mut *tx)
            .await?;

        let event = preventia_core::audit::AuditEvent::builder(
            preventia_core::audit::AuditAction::Delete,
            "source soft-deleted",
        )
        .resource("sources", source_id.to_string())
        .build();

        self.audit.log_event_tx(&mut tx, event).await?;
        tx.commit().await?;

        Ok(())
    }

    async fn suspend_source(&self, source_id: i64, reason: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE sources SET status = 'suspended', updated_at = now() WHERE source_id = $1")
            .bind(source_id)
            .execute(&mut *tx)
            .await?;

        let event = preventia_core::audit::AuditEvent::builder(
            preventia_core::audit::AuditAction::Suspend,
            format!("source suspended: {}", reason),
        )
        .resource("sources", source_id.to_string())
        .severity(preventia_core::audit::EventSeverity::Warning)
        .build();

        self.audit.log_event_tx(&mut tx, event).await?;
        tx.commit().await?;

        Ok(())
    }

    async fn activate_source(&self, source_id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE sources SET status = 'active', updated_at = now() WHERE source_id = $1")
            .bind(source_id)
            .execute(&mut *tx)
            .await?;

        let event = preventia_core::audit::AuditEvent::builder(
            preventia_core::audit::AuditAction::Activate,
            "source activated",
        )
        .resource("sources", source_id.to_string())
        .build();

        self.audit.log_event_tx(&mut tx, event).await?;
        tx.commit().await?;

        Ok(())
    }

    /// Recomputes the compliance score (§4.1 `score_source`) from the
    /// source's current persisted flags and transitions it to `suspended`
    /// if the new score drops into the critical band.
    async fn revalidate_compliance(&self, source_id: i64) -> Result<(f64, preventia_compliance::RiskTier)> {
        let before = self.fetch_source(source_id).await?;

        let inputs = ComplianceInputs {
            robots_txt_compliant: before.scraping_allowed != ScrapingAllowed::False,
            legal_contact_verified: before.legal_contact_email.is_some(),
            terms_acceptable: before.terms_reviewed_at.is_some(),
            fair_use_documented: before.fair_use_basis.len() >= 50,
            data_minimization_applied: before.content_type != ContentTypeColumn::Full,
        };
        let (score, tier) = score_source(inputs);

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "UPDATE sources SET compliance_score = $1, robots_txt_last_checked = $2, updated_at = now() \
             WHERE source_id = $3",
        )
        .bind(score)
        .bind(Utc::now())
        .bind(source_id)
        .execute(&mut *tx)
        .await?;

        if tier == preventia_compliance::RiskTier::Critical && before.status == SourceStatusColumn::Active {
            sqlx::query("UPDATE sources SET status = 'suspended' WHERE source_id = $1")
                .bind(source_id)
                .execute(&mut *tx)
                .await?;
        }

        let event = source_validated(source_id, Some(before.compliance_score), score, tier);
        self.audit.log_event_tx(&mut tx, event).await?;
        tx.commit().await?;

        Ok((score, tier))
    }
}
