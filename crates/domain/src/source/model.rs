//! The `Source` aggregate (§3): a news site registered for ingestion, its
//! compliance metadata, and its retention/lifecycle policy.

use chrono::{DateTime, Utc};
use preventia_compliance::{ContentType, SourceSnapshot, SourceStatus};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "source_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    NewsSite,
    Academic,
    Government,
    Ngo,
    MedicalJournal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "scraping_allowed_state", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ScrapingAllowed {
    True,
    False,
    Unknown,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Source {
    pub source_id: i64,
    pub name: String,
    pub base_url: String,
    pub country: String,
    pub language: String,
    pub source_type: SourceType,

    pub robots_txt_url: Option<String>,
    pub robots_txt_last_checked: Option<DateTime<Utc>>,
    pub crawl_delay_seconds: f64,
    pub scraping_allowed: ScrapingAllowed,
    pub terms_reviewed_at: Option<DateTime<Utc>>,
    pub legal_contact_email: Option<String>,
    pub fair_use_basis: String,
    pub compliance_score: f64,

    pub content_type: ContentTypeColumn,
    pub data_retention_days: i32,
    pub max_articles_per_run: i32,

    pub status: SourceStatusColumn,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `sqlx`/`serde` wrapper around `preventia_compliance::ContentType` — the
/// compliance crate's type has no `sqlx::Type` impl of its own since it must
/// stay free of a database dependency; the domain crate, which owns
/// persistence, supplies the column mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "content_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ContentTypeColumn {
    MetadataOnly,
    SummaryOnly,
    Full,
}

impl From<ContentTypeColumn> for ContentType {
    fn from(value: ContentTypeColumn) -> Self {
        match value {
            ContentTypeColumn::MetadataOnly => ContentType::MetadataOnly,
            ContentTypeColumn::SummaryOnly => ContentType::SummaryOnly,
            ContentTypeColumn::Full => ContentType::Full,
        }
    }
}

impl From<ContentType> for ContentTypeColumn {
    fn from(value: ContentType) -> Self {
        match value {
            ContentType::MetadataOnly => ContentTypeColumn::MetadataOnly,
            ContentType::SummaryOnly => ContentTypeColumn::SummaryOnly,
            ContentType::Full => ContentTypeColumn::Full,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "source_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SourceStatusColumn {
    Active,
    Inactive,
    Suspended,
    UnderReview,
    Deleted,
}

impl From<SourceStatusColumn> for SourceStatus {
    fn from(value: SourceStatusColumn) -> Self {
        match value {
            SourceStatusColumn::Active => SourceStatus::Active,
            SourceStatusColumn::Inactive => SourceStatus::Inactive,
            SourceStatusColumn::Suspended => SourceStatus::Suspended,
            SourceStatusColumn::UnderReview => SourceStatus::UnderReview,
            SourceStatusColumn::Deleted => SourceStatus::Deleted,
        }
    }
}

impl Source {
    /// Projects the persisted row into the slice the compliance evaluator
    /// needs, without handing the evaluator a dependency on persistence.
    pub fn to_snapshot(&self) -> SourceSnapshot {
        SourceSnapshot {
            id: self.source_id,
            base_url: self.base_url.clone(),
            status: self.status.into(),
            crawl_delay_seconds: self.crawl_delay_seconds,
            content_type: self.content_type.into(),
            data_retention_days: self.data_retention_days,
        }
    }
}

/// Validated input for creating a Source (§4.3).
#[derive(Debug, Clone, Validate, Deserialize)]
pub struct CreateSourceRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub base_url: String,
    #[validate(length(min = 2, max = 2))]
    pub country: String,
    #[validate(length(min = 2, max = 2))]
    pub language: String,
    pub source_type: SourceType,
    #[validate(range(min = 1.0))]
    pub crawl_delay_seconds: f64,
    #[validate(length(min = 50))]
    pub fair_use_basis: String,
    pub legal_contact_email: Option<String>,
    pub content_type: ContentTypeColumn,
    #[validate(range(min = 30, max = 2555))]
    pub data_retention_days: i32,
    #[validate(range(min = 1, max = 500))]
    pub max_articles_per_run: i32,
    /// Only honored when an operator with elevated privilege explicitly
    /// sets this — `content_type = full` otherwise rejects (§4.3).
    pub full_content_override: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSourceRequest {
    pub name: Option<String>,
    pub crawl_delay_seconds: Option<f64>,
    pub fair_use_basis: Option<String>,
    pub legal_contact_email: Option<String>,
    pub content_type: Option<ContentTypeColumn>,
    pub data_retention_days: Option<i32>,
    pub max_articles_per_run: Option<i32>,
    pub terms_reviewed_at: Option<DateTime<Utc>>,
    /// Same gate as `CreateSourceRequest::full_content_override` — required
    /// when `content_type` is being changed to `Full` (§4.3).
    pub full_content_override: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_round_trips_through_compliance_type() {
        let column = ContentTypeColumn::SummaryOnly;
        let compliance: ContentType = column.into();
        let back: ContentTypeColumn = compliance.into();
        assert_eq!(column, back);
    }
}
