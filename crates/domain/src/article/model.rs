//! The `Article` aggregate (§3): one ingested item, owned exclusively by a
//! Source, carrying compliance and NLP annotations alongside its content.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Priority-ordered topic set (§3) — index doubles as the tie-break rank
/// when two topics score equally in classification (§4.6).
pub const TOPIC_SET: [&str; 10] = [
    "treatment",
    "research",
    "surgery",
    "diagnosis",
    "genetics",
    "prevention",
    "screening",
    "lifestyle",
    "policy",
    "general",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "copyright_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CopyrightStatus {
    Unknown,
    Cleared,
    FairUse,
    Violation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "legal_review_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LegalReviewStatus {
    Pending,
    NeedsReview,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "robots_compliant_state", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RobotsCompliantState {
    True,
    False,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "sentiment_label", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "processing_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    Pending,
    Completed,
    Failed,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Article {
    pub article_id: i64,
    pub url: String,
    pub content_hash: String,
    pub source_id: i64,

    pub title: String,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub word_count: Option<i32>,
    pub language: String,
    pub published_at: Option<DateTime<Utc>>,
    pub scraped_at: DateTime<Utc>,
    pub author: Option<String>,

    pub robots_txt_compliant: RobotsCompliantState,
    pub copyright_status: CopyrightStatus,
    pub fair_use_basis: Option<String>,
    pub scraping_permission: Option<String>,
    pub legal_review_status: LegalReviewStatus,
    pub data_retention_expires_at: DateTime<Utc>,

    pub sentiment_label: Option<SentimentLabel>,
    pub sentiment_score: Option<f64>,
    pub sentiment_confidence: Option<f64>,
    /// Free-text topic name (one of `TOPIC_SET`) rather than a DB enum — the
    /// classifier's keyword map can grow new topics without a migration.
    pub topic_category: Option<String>,
    pub topic_confidence: Option<f64>,
    pub processing_status: ProcessingStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    /// §3 invariant: NLP fields are all-or-nothing.
    pub fn nlp_fields_consistent(&self) -> bool {
        let all_present = self.sentiment_label.is_some()
            && self.sentiment_score.is_some()
            && self.sentiment_confidence.is_some()
            && self.topic_category.is_some()
            && self.topic_confidence.is_some();
        let all_absent = self.sentiment_label.is_none()
            && self.sentiment_score.is_none()
            && self.sentiment_confidence.is_none()
            && self.topic_category.is_none()
            && self.topic_confidence.is_none();

        match self.processing_status {
            ProcessingStatus::Completed => all_present,
            _ => all_absent,
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ArticleKeyword {
    pub article_id: i64,
    pub keyword: String,
    pub relevance_score: f64,
    pub keyword_type: String,
}

/// Input for inserting a freshly scraped Article (§4.4/§4.5); NLP fields
/// aren't present yet since extraction always precedes analysis.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub url: String,
    pub content_hash: String,
    pub source_id: i64,
    pub title: String,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub word_count: Option<i32>,
    pub language: String,
    pub published_at: Option<DateTime<Utc>>,
    pub scraped_at: DateTime<Utc>,
    pub author: Option<String>,
    pub robots_txt_compliant: RobotsCompliantState,
    pub copyright_status: CopyrightStatus,
    pub fair_use_basis: Option<String>,
    pub scraping_permission: Option<String>,
    pub legal_review_status: LegalReviewStatus,
    pub data_retention_expires_at: DateTime<Utc>,
}

/// Result of a completed NLP pass (§4.6), applied atomically.
#[derive(Debug, Clone)]
pub struct NlpResult {
    pub sentiment_label: SentimentLabel,
    pub sentiment_score: f64,
    pub sentiment_confidence: f64,
    pub topic_category: String,
    pub topic_confidence: f64,
    pub keywords: Vec<(String, f64, String)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_article(processing_status: ProcessingStatus) -> Article {
        let now = Utc::now();
        Article {
            article_id: 1,
            url: "https://example.com/a".to_string(),
            content_hash: "hash".to_string(),
            source_id: 1,
            title: "Title".to_string(),
            summary: Some("Summary".to_string()),
            content: None,
            word_count: Some(10),
            language: "en".to_string(),
            published_at: Some(now),
            scraped_at: now,
            author: None,
            robots_txt_compliant: RobotsCompliantState::True,
            copyright_status: CopyrightStatus::FairUse,
            fair_use_basis: None,
            scraping_permission: None,
            legal_review_status: LegalReviewStatus::Pending,
            data_retention_expires_at: now,
            sentiment_label: None,
            sentiment_score: None,
            sentiment_confidence: None,
            topic_category: None,
            topic_confidence: None,
            processing_status,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn pending_article_with_no_nlp_fields_is_consistent() {
        assert!(base_article(ProcessingStatus::Pending).nlp_fields_consistent());
    }

    #[test]
    fn completed_article_with_no_nlp_fields_is_inconsistent() {
        assert!(!base_article(ProcessingStatus::Completed).nlp_fields_consistent());
    }

    #[test]
    fn completed_article_with_all_nlp_fields_is_consistent() {
        let mut article = base_article(ProcessingStatus::Completed);
        article.sentiment_label = Some(SentimentLabel::Positive);
        article.sentiment_score = Some(0.5);
        article.sentiment_confidence = Some(0.5);
        article.topic_category = Some("treatment".to_string());
        article.topic_confidence = Some(0.8);
        assert!(article.nlp_fields_consistent());
    }
}
