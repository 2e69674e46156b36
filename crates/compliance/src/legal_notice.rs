//! External takedown/DMCA/privacy notices and the store-side check that
//! blocks ingestion for a domain under an active notice.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use preventia_core::error::Result;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notice_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NoticeType {
    Dmca,
    Copyright,
    Privacy,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "legal_notice_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LegalNoticeStatus {
    Received,
    Reviewing,
    Complied,
    Disputed,
    Active,
    Expired,
    Superseded,
    Withdrawn,
}

impl LegalNoticeStatus {
    /// Statuses under which `evaluate_store` must block ingestion for the
    /// affected domain (§4.1).
    pub fn blocks_ingestion(self) -> bool {
        matches!(
            self,
            LegalNoticeStatus::Received | LegalNoticeStatus::Reviewing | LegalNoticeStatus::Active
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegalNotice {
    pub id: Uuid,
    pub notice_type: NoticeType,
    pub source_domain: String,
    pub affected_articles: Vec<i64>,
    pub status: LegalNoticeStatus,
    pub received_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait LegalNoticeRepository: Send + Sync {
    /// True if `domain` has any notice in a status that blocks ingestion.
    async fn has_blocking_notice(&self, domain: &str) -> Result<bool>;

    async fn create(&self, notice: &LegalNotice) -> Result<()>;

    async fn set_status(&self, id: Uuid, status: LegalNoticeStatus) -> Result<()>;

    async fn list_for_domain(&self, domain: &str) -> Result<Vec<LegalNotice>>;
}

pub struct PostgresLegalNoticeRepository {
    pool: PgPool,
}

impl PostgresLegalNoticeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LegalNoticeRepository for PostgresLegalNoticeRepository {
    async fn has_blocking_notice(&self, domain: &str) -> Result<bool> {
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT COUNT(*) FROM legal_notices \
             WHERE source_domain = $1 AND status IN ('received', 'reviewing', 'active')",
        )
        .bind(domain)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(count,)| count > 0).unwrap_or(false))
    }

    async fn create(&self, notice: &LegalNotice) -> Result<()> {
        sqlx::query(
            "INSERT INTO legal_notices \
             (id, notice_type, source_domain, affected_articles, status, received_at, resolved_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(notice.id)
        .bind(notice.notice_type)
        .bind(&notice.source_domain)
        .bind(&notice.affected_articles)
        .bind(notice.status)
        .bind(notice.received_at)
        .bind(notice.resolved_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn set_status(&self, id: Uuid, status: LegalNoticeStatus) -> Result<()> {
        let resolved_at = matches!(
            status,
            LegalNoticeStatus::Complied | LegalNoticeStatus::Withdrawn | LegalNoticeStatus::Expired
        )
        .then(Utc::now);

        sqlx::query("UPDATE legal_notices SET status = $1, resolved_at = $2 WHERE id = $3")
            .bind(status)
            .bind(resolved_at)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list_for_domain(&self, domain: &str) -> Result<Vec<LegalNotice>> {
        let rows = sqlx::query_as::<_, (Uuid, NoticeType, String, Vec<i64>, LegalNoticeStatus, DateTime<Utc>, Option<DateTime<Utc>>)>(
            "SELECT id, notice_type, source_domain, affected_articles, status, received_at, resolved_at \
             FROM legal_notices WHERE source_domain = $1 ORDER BY received_at DESC",
        )
        .bind(domain)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(id, notice_type, source_domain, affected_articles, status, received_at, resolved_at)| LegalNotice {
                    id,
                    notice_type,
                    source_domain,
                    affected_articles,
                    status,
                    received_at,
                    resolved_at,
                },
            )
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocking_statuses_match_spec() {
        assert!(LegalNoticeStatus::Received.blocks_ingestion());
        assert!(LegalNoticeStatus::Reviewing.blocks_ingestion());
        assert!(LegalNoticeStatus::Active.blocks_ingestion());
        assert!(!LegalNoticeStatus::Complied.blocks_ingestion());
        assert!(!LegalNoticeStatus::Disputed.blocks_ingestion());
        assert!(!LegalNoticeStatus::Expired.blocks_ingestion());
    }
}
